use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NcaaKind {
    Football,
    Basketball,
}

/// Static description of one supported league. Instances live in [`LEAGUES`]
/// and are never constructed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeagueDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub sport_path: &'static str,
    pub league_path: &'static str,
    pub ncaa_kind: Option<NcaaKind>,
    /// Upstream group/division id used to scope NCAA scoreboard queries.
    pub default_group: Option<&'static str>,
}

impl LeagueDefinition {
    pub fn is_ncaa(&self) -> bool {
        self.ncaa_kind.is_some()
    }
}

pub static LEAGUES: [LeagueDefinition; 6] = [
    LeagueDefinition {
        key: "nfl",
        name: "NFL",
        sport_path: "football",
        league_path: "nfl",
        ncaa_kind: None,
        default_group: None,
    },
    LeagueDefinition {
        key: "nba",
        name: "NBA",
        sport_path: "basketball",
        league_path: "nba",
        ncaa_kind: None,
        default_group: None,
    },
    LeagueDefinition {
        key: "nhl",
        name: "NHL",
        sport_path: "hockey",
        league_path: "nhl",
        ncaa_kind: None,
        default_group: None,
    },
    LeagueDefinition {
        key: "mlb",
        name: "MLB",
        sport_path: "baseball",
        league_path: "mlb",
        ncaa_kind: None,
        default_group: None,
    },
    LeagueDefinition {
        key: "ncaam",
        name: "NCAA MBB",
        sport_path: "basketball",
        league_path: "mens-college-basketball",
        ncaa_kind: Some(NcaaKind::Basketball),
        default_group: Some("50"),
    },
    LeagueDefinition {
        key: "ncaaf",
        name: "NCAA FB",
        sport_path: "football",
        league_path: "college-football",
        ncaa_kind: Some(NcaaKind::Football),
        default_group: Some("80"),
    },
];

pub fn league_by_key(key: &str) -> Option<&'static LeagueDefinition> {
    LEAGUES.iter().find(|l| l.key == key)
}

/// Uppercases and collapses interior whitespace so user-supplied names
/// compare against the upstream spellings.
pub fn normalize_name(value: &str) -> String {
    value
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

const FOOTBALL_CONFERENCES: &[(&str, u32)] = &[
    ("ACC", 1),
    ("AMERICAN ATHLETIC", 151),
    ("BIG 12", 4),
    ("BIG TEN", 5),
    ("C-USA", 12),
    ("INDEPENDENTS", 18),
    ("MAC", 15),
    ("MOUNTAIN WEST", 17),
    ("PAC-12", 9),
    ("SEC", 8),
    ("SUN BELT", 37),
    ("FCS INDEPENDENTS", 40),
    ("ASUN-WAC", 48),
    ("BIG SKY", 20),
    ("BIG SOUTH-OVC", 73),
    ("CAA", 68),
    ("FCS (IA) INDEPENDENTS", 40),
    ("IVY", 22),
    ("MEAC", 16),
    ("MISSOURI VALLEY", 21),
    ("NORTHEAST", 24),
    ("PATRIOT", 25),
    ("PIONEER", 81),
    ("SOCON", 27),
    ("SOUTHLAND", 26),
    ("SWAC", 28),
    ("UAC", 98),
];

const BASKETBALL_CONFERENCES: &[(&str, u32)] = &[
    ("ACC", 2),
    ("AMERICA EAST", 1),
    ("AMERICAN ATHLETIC", 62),
    ("ATLANTIC 10", 3),
    ("ATLANTIC SUN", 17),
    ("BIG 12", 8),
    ("BIG EAST", 4),
    ("BIG SKY", 5),
    ("BIG SOUTH", 6),
    ("BIG TEN", 7),
    ("BIG WEST", 9),
    ("C-USA", 12),
    ("CAA", 10),
    ("HORIZON LEAGUE", 45),
    ("IVY", 13),
    ("MAAC", 14),
    ("MAC", 15),
    ("MEAC", 16),
    ("MISSOURI VALLEY", 18),
    ("MOUNTAIN WEST", 19),
    ("NORTHEAST", 20),
    ("OHIO VALLEY", 23),
    ("PATRIOT", 24),
    ("SEC", 23),
    ("SOCON", 26),
    ("SOUTHLAND", 27),
    ("SUMMIT LEAGUE", 25),
    ("SUN BELT", 37),
    ("SWAC", 28),
    ("WAC", 29),
    ("WEST COAST", 30),
];

static FOOTBALL_LOOKUP: Lazy<HashMap<String, u32>> = Lazy::new(|| build_lookup(FOOTBALL_CONFERENCES));
static BASKETBALL_LOOKUP: Lazy<HashMap<String, u32>> =
    Lazy::new(|| build_lookup(BASKETBALL_CONFERENCES));

fn build_lookup(table: &[(&str, u32)]) -> HashMap<String, u32> {
    table
        .iter()
        .map(|&(name, id)| (normalize_name(name), id))
        .collect()
}

/// Looks up an NCAA conference id by (user-supplied) name.
pub fn conference_id(kind: NcaaKind, name: &str) -> Option<u32> {
    let lookup = match kind {
        NcaaKind::Football => &*FOOTBALL_LOOKUP,
        NcaaKind::Basketball => &*BASKETBALL_LOOKUP,
    };
    lookup.get(&normalize_name(name)).copied()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_league_registry() {
        assert_eq!(LEAGUES.len(), 6);
        let ncaaf = league_by_key("ncaaf").unwrap();
        assert_eq!(ncaaf.ncaa_kind, Some(NcaaKind::Football));
        assert_eq!(ncaaf.default_group, Some("80"));
        assert!(league_by_key("nfl").unwrap().default_group.is_none());
        assert!(league_by_key("xfl").is_none());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  big   ten "), "BIG TEN");
        assert_eq!(normalize_name("Sec"), "SEC");
    }

    #[test]
    fn test_conference_lookup() {
        assert_eq!(conference_id(NcaaKind::Football, "Big Ten"), Some(5));
        assert_eq!(conference_id(NcaaKind::Basketball, "big ten"), Some(7));
        assert_eq!(conference_id(NcaaKind::Basketball, "MADE UP"), None);
    }
}
