//! The upstream scoreboard client.

use crate::error::FetchError;
use log::*;
use std::collections::BTreeMap;
use std::time::Duration;
use ticker_common::{league::LeagueDefinition, scoreboard::ScoreboardResponse};

pub const ESPN_BASE: &str = "https://site.api.espn.com/apis/site/v2/sports";

/// Source of scoreboard payloads. The production implementation is
/// [`EspnClient`]; tests substitute canned responses.
pub trait ScoreboardSource {
    fn fetch(
        &self,
        league: &LeagueDefinition,
        params: &BTreeMap<&'static str, String>,
    ) -> Result<ScoreboardResponse, FetchError>;
}

pub struct EspnClient {
    client: reqwest::blocking::Client,
    base: String,
}

impl EspnClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("sports-ticker/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base: ESPN_BASE.to_string(),
        })
    }

    fn scoreboard_url(&self, league: &LeagueDefinition) -> String {
        format!(
            "{}/{}/{}/scoreboard",
            self.base, league.sport_path, league.league_path
        )
    }
}

impl ScoreboardSource for EspnClient {
    fn fetch(
        &self,
        league: &LeagueDefinition,
        params: &BTreeMap<&'static str, String>,
    ) -> Result<ScoreboardResponse, FetchError> {
        let url = self.scoreboard_url(league);
        debug!("Requesting {url} with params {params:?}");
        let response = self
            .client
            .get(&url)
            .query(&params.iter().collect::<Vec<_>>())
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.json()?)
    }
}
