use crate::league::NcaaKind;
use log::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

/// Per-league enable flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Leagues {
    pub nfl: bool,
    pub nba: bool,
    pub nhl: bool,
    pub mlb: bool,
    pub ncaam: bool,
    pub ncaaf: bool,
}

impl Default for Leagues {
    fn default() -> Self {
        Self {
            nfl: true,
            nba: true,
            nhl: true,
            mlb: true,
            ncaam: true,
            ncaaf: true,
        }
    }
}

impl Leagues {
    pub fn enabled(&self, key: &str) -> bool {
        match key {
            "nfl" => self.nfl,
            "nba" => self.nba,
            "nhl" => self.nhl,
            "mlb" => self.mlb,
            "ncaam" => self.ncaam,
            "ncaaf" => self.ncaaf,
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NcaaFilters {
    pub ncaam_teams: StringList,
    pub ncaaf_teams: StringList,
    pub ncaam_conferences: StringList,
    pub ncaaf_conferences: StringList,
    pub top25_only: bool,
}

impl NcaaFilters {
    pub fn teams(&self, kind: NcaaKind) -> &StringList {
        match kind {
            NcaaKind::Football => &self.ncaaf_teams,
            NcaaKind::Basketball => &self.ncaam_teams,
        }
    }

    pub fn conferences(&self, kind: NcaaKind) -> &StringList {
        match kind {
            NcaaKind::Football => &self.ncaaf_conferences,
            NcaaKind::Basketball => &self.ncaam_conferences,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub card_padding: u32,
    pub logo_gap: u32,
    pub segment_spacing: u32,
    pub section_spacing: u32,
    pub header_logo_size: u32,
    pub font_size: u32,
    pub show_section_labels: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            card_padding: 4,
            logo_gap: 3,
            segment_spacing: 12,
            section_spacing: 20,
            header_logo_size: 16,
            font_size: 8,
            show_section_labels: true,
        }
    }
}

impl Layout {
    /// Gap inserted between consecutive ticker items.
    pub fn item_spacing(&self) -> u32 {
        self.segment_spacing + self.section_spacing
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub header: Rgb,
    pub text: Rgb,
    pub live: Rgb,
    #[serde(rename = "final")]
    pub finished: Rgb,
    pub upcoming: Rgb,
    pub spread: Rgb,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            header: Rgb::new(255, 255, 255),
            text: Rgb::new(255, 255, 255),
            live: Rgb::new(0, 255, 120),
            finished: Rgb::new(180, 180, 180),
            upcoming: Rgb::new(255, 215, 0),
            spread: Rgb::new(120, 200, 255),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scrolling {
    pub enabled: bool,
    pub speed_px: u32,
    pub frame_delay_ms: u64,
}

impl Default for Scrolling {
    fn default() -> Self {
        Self {
            enabled: true,
            speed_px: 1,
            frame_delay_ms: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Refresh {
    pub update_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub timezone: String,
    pub max_games_per_section: usize,
}

impl Default for Refresh {
    fn default() -> Self {
        Self {
            update_interval_secs: 120,
            request_timeout_secs: 12,
            timezone: "America/New_York".to_string(),
            max_games_per_section: 8,
        }
    }
}

impl Refresh {
    /// The configured IANA timezone, falling back to UTC on bad names.
    pub fn resolve_timezone(&self) -> chrono_tz::Tz {
        match self.timezone.parse() {
            Ok(tz) => tz,
            Err(_) => {
                warn!("Invalid timezone '{}', falling back to UTC", self.timezone);
                chrono_tz::UTC
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    pub leagues: Leagues,
    pub ncaa: NcaaFilters,
    pub layout: Layout,
    pub colors: Colors,
    pub scrolling: Scrolling,
    pub refresh: Refresh,
    pub vegas_mode: Option<String>,
}

impl TickerConfig {
    pub fn new_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let config_file = match read_to_string(path) {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to read config file: {}", e);
                return Err(Box::new(e));
            }
        };

        match toml::from_str(&config_file) {
            Ok(c) => Ok(c),
            Err(e) => {
                error!("Failed to parse config file: {}", e);
                Err(Box::new(e))
            }
        }
    }
}

/// An RGB triple, configurable as `[r, g, b]` or `"r,g,b"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.r, self.g, self.b].serialize(serializer)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(format!("expected three comma-separated values, got '{s}'"));
        }
        let mut channels = [0u8; 3];
        for (channel, part) in channels.iter_mut().zip(&parts) {
            let value: i64 = part
                .parse()
                .map_err(|_| format!("invalid color channel '{part}'"))?;
            *channel = value.clamp(0, 255) as u8;
        }
        Ok(Self::new(channels[0], channels[1], channels[2]))
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Triple(Vec<i64>),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Triple(values) => {
                if values.len() != 3 {
                    return Err(serde::de::Error::custom("expected three color channels"));
                }
                Ok(Self::new(
                    values[0].clamp(0, 255) as u8,
                    values[1].clamp(0, 255) as u8,
                    values[2].clamp(0, 255) as u8,
                ))
            }
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A list of strings, configurable as a list or as one comma-separated
/// string. Entries are trimmed; empty entries are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringList(Vec<String>);

impl StringList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> From<Vec<S>> for StringList {
    fn from(items: Vec<S>) -> Self {
        Self(
            items
                .into_iter()
                .map(|item| item.into().trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        )
    }
}

impl Serialize for StringList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StringList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<String>),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::List(items) => Self::from(items),
            Repr::Text(text) => Self::from(text.split(',').collect::<Vec<_>>()),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn initialize() {
        INIT.call_once(env_logger::init);
    }

    #[test]
    fn test_ser_leagues() {
        let leagues: Leagues = Default::default();
        let serialized = toml::to_string(&leagues).unwrap();
        let deser = toml::from_str(&serialized);
        assert_eq!(deser, Ok(leagues));
    }

    #[test]
    fn test_ser_layout() {
        let layout: Layout = Default::default();
        assert_eq!(layout.item_spacing(), 32);
        let serialized = toml::to_string(&layout).unwrap();
        let deser = toml::from_str(&serialized);
        assert_eq!(deser, Ok(layout));
    }

    #[test]
    fn test_ser_colors() {
        let colors: Colors = Default::default();
        let serialized = toml::to_string(&colors).unwrap();
        let deser = toml::from_str(&serialized);
        assert_eq!(deser, Ok(colors));
    }

    #[test]
    fn test_ser_config() {
        let config: TickerConfig = Default::default();
        let serialized = toml::to_string(&config).unwrap();
        let deser = toml::from_str(&serialized);
        assert_eq!(deser, Ok(config));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: TickerConfig = toml::from_str(
            r#"[leagues]
               nhl = false

               [colors]
               live = "0, 200, 100""#,
        )
        .unwrap();
        assert!(!config.leagues.nhl);
        assert!(config.leagues.nfl);
        assert_eq!(config.colors.live, Rgb::new(0, 200, 100));
        assert_eq!(config.colors.text, Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_rgb_forms() {
        let color: Rgb = toml::from_str::<toml::Table>("c = [10, 20, 300]")
            .unwrap()
            .remove("c")
            .unwrap()
            .try_into()
            .unwrap();
        assert_eq!(color, Rgb::new(10, 20, 255));

        assert_eq!("1,2,3".parse::<Rgb>(), Ok(Rgb::new(1, 2, 3)));
        assert!("1,2".parse::<Rgb>().is_err());
        assert!("a,b,c".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_string_list_forms() {
        #[derive(Deserialize)]
        struct Holder {
            teams: StringList,
        }

        let list: Holder = toml::from_str(r#"teams = ["OSU", " mich ", ""]"#).unwrap();
        assert_eq!(list.teams.as_slice(), ["OSU", "mich"]);

        let text: Holder = toml::from_str(r#"teams = "OSU, mich,,PSU""#).unwrap();
        assert_eq!(text.teams.as_slice(), ["OSU", "mich", "PSU"]);
    }

    #[test]
    fn test_timezone_fallback() {
        initialize();
        let mut refresh = Refresh::default();
        assert_eq!(refresh.resolve_timezone(), chrono_tz::America::New_York);
        refresh.timezone = "Not/AZone".to_string();
        assert_eq!(refresh.resolve_timezone(), chrono_tz::UTC);
    }
}
