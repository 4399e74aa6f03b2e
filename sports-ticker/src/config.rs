use log::*;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;
use ticker_common::{config::TickerConfig, panel_support};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hardware {
    pub panel_width: u32,
    pub panel_height: u32,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            panel_width: panel_support::DEFAULT_PANEL_WIDTH,
            panel_height: panel_support::DEFAULT_PANEL_HEIGHT,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hardware: Hardware,
    pub ticker: TickerConfig,
}

impl Config {
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
