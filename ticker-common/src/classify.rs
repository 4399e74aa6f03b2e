//! Partitions one league's games into the three ticker sections.

use crate::game::{GameEntry, GameState};

/// One league's games, bucketed and ordered for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    pub live: Vec<GameEntry>,
    pub upcoming: Vec<GameEntry>,
    pub finished: Vec<GameEntry>,
}

impl Sections {
    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.upcoming.is_empty() && self.finished.is_empty()
    }

    pub fn counts(&self) -> SectionCounts {
        SectionCounts {
            live: self.live.len(),
            upcoming: self.upcoming.len(),
            finished: self.finished.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounts {
    pub live: usize,
    pub upcoming: usize,
    pub finished: usize,
}

/// Upcoming and live sort ascending by start time, finished descending
/// (most recently completed first). Each bucket is capped at
/// `max_per_section`.
pub fn classify(games: Vec<GameEntry>, max_per_section: usize) -> Sections {
    let mut sections = Sections::default();
    for game in games {
        match game.state {
            GameState::Live => sections.live.push(game),
            GameState::Upcoming => sections.upcoming.push(game),
            GameState::Final => sections.finished.push(game),
        }
    }

    sections.live.sort_by_key(|game| game.start_local);
    sections.upcoming.sort_by_key(|game| game.start_local);
    sections.finished.sort_by_key(|game| game.start_local);
    sections.finished.reverse();

    let cap = max_per_section.max(1);
    sections.live.truncate(cap);
    sections.upcoming.truncate(cap);
    sections.finished.truncate(cap);
    sections
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn game(state: GameState, hour: u32) -> GameEntry {
        let tz: Tz = chrono_tz::UTC;
        GameEntry {
            event_id: format!("{state:?}-{hour}"),
            league_key: "nfl",
            state,
            start_local: tz.with_ymd_and_hms(2026, 8, 27, hour, 0, 0).unwrap(),
            short_status: String::new(),
            away_abbr: "AAA".to_string(),
            home_abbr: "HHH".to_string(),
            away_score: "0".to_string(),
            home_score: "0".to_string(),
            live_period_label: String::new(),
            live_clock: String::new(),
            away_rank: None,
            home_rank: None,
            away_conf: None,
            home_conf: None,
            away_conf_name: None,
            home_conf_name: None,
            away_logo_url: None,
            home_logo_url: None,
            spread_text: None,
        }
    }

    fn hours(games: &[GameEntry]) -> Vec<u32> {
        use chrono::Timelike;
        games.iter().map(|g| g.start_local.hour()).collect()
    }

    #[test]
    fn test_ordering() {
        let games = vec![
            game(GameState::Final, 18),
            game(GameState::Upcoming, 23),
            game(GameState::Final, 20),
            game(GameState::Live, 21),
            game(GameState::Upcoming, 22),
            game(GameState::Live, 19),
        ];
        let sections = classify(games, 8);
        assert_eq!(hours(&sections.live), vec![19, 21]);
        assert_eq!(hours(&sections.upcoming), vec![22, 23]);
        assert_eq!(hours(&sections.finished), vec![20, 18]);
    }

    #[test]
    fn test_caps() {
        let games = (0..6).map(|h| game(GameState::Upcoming, h)).collect();
        let sections = classify(games, 4);
        assert_eq!(hours(&sections.upcoming), vec![0, 1, 2, 3]);

        // A zero cap still shows one game per section.
        let games = (0..3).map(|h| game(GameState::Live, h)).collect();
        let sections = classify(games, 0);
        assert_eq!(sections.live.len(), 1);
    }

    #[test]
    fn test_empty() {
        let sections = classify(vec![], 8);
        assert!(sections.is_empty());
        assert_eq!(sections.counts(), SectionCounts::default());
    }
}
