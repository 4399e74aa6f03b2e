//! Serde models for the upstream scoreboard payload.
//!
//! The payload is treated as untrusted and partial: every field is optional
//! or defaulted, and fields whose type varies upstream (ids and scores are
//! sometimes numbers, sometimes strings) go through the flexible
//! deserializers below so one odd field never discards a whole event.

use log::*;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreboardResponse {
    #[serde(deserialize_with = "deser_event_list")]
    pub events: Vec<Event>,
    pub leagues: Vec<LeagueInfo>,
}

impl ScoreboardResponse {
    pub fn league_logo_url(&self) -> Option<&str> {
        self.leagues
            .first()?
            .logos
            .first()
            .map(|logo| logo.href.as_str())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeagueInfo {
    pub logos: Vec<LogoInfo>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoInfo {
    pub href: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    #[serde(deserialize_with = "deser_flex_string")]
    pub id: Option<String>,
    pub date: Option<String>,
    pub status: Status,
    pub competitions: Vec<Competition>,
    pub odds: Vec<Odds>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Competition {
    pub competitors: Vec<Competitor>,
    pub odds: Vec<Odds>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Competitor {
    pub home_away: String,
    #[serde(deserialize_with = "deser_flex_string")]
    pub score: Option<String>,
    pub curated_rank: Option<CuratedRank>,
    #[serde(deserialize_with = "deser_flex_u32")]
    pub rank: Option<u32>,
    #[serde(deserialize_with = "deser_flex_u32")]
    pub conference_id: Option<u32>,
    pub team: Team,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CuratedRank {
    #[serde(deserialize_with = "deser_flex_u32")]
    pub current: Option<u32>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Team {
    pub abbreviation: Option<String>,
    pub short_display_name: Option<String>,
    pub display_name: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "deser_flex_u32")]
    pub conference_id: Option<u32>,
    pub conference: Option<ConferenceInfo>,
    #[serde(deserialize_with = "deser_or_default")]
    pub groups: Vec<GroupInfo>,
    pub logos: Vec<LogoInfo>,
    pub logo: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConferenceInfo {
    pub short_name: Option<String>,
    pub abbreviation: Option<String>,
    pub name: Option<String>,
    pub display_name: Option<String>,
}

impl ConferenceInfo {
    pub fn best_name(&self) -> Option<&str> {
        self.short_name
            .as_deref()
            .or(self.abbreviation.as_deref())
            .or(self.name.as_deref())
            .or(self.display_name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupInfo {
    #[serde(deserialize_with = "deser_flex_u32")]
    pub id: Option<u32>,
    pub short_name: Option<String>,
    pub abbreviation: Option<String>,
    pub name: Option<String>,
    pub display_name: Option<String>,
}

impl GroupInfo {
    pub fn best_name(&self) -> Option<&str> {
        self.short_name
            .as_deref()
            .or(self.abbreviation.as_deref())
            .or(self.name.as_deref())
            .or(self.display_name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Status {
    #[serde(deserialize_with = "deser_flex_u32")]
    pub period: Option<u32>,
    pub display_clock: Option<String>,
    #[serde(rename = "type")]
    pub kind: StatusType,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusType {
    pub state: String,
    pub short_detail: Option<String>,
    pub detail: Option<String>,
    pub description: Option<String>,
}

impl StatusType {
    pub fn best_detail(&self) -> Option<&str> {
        self.short_detail
            .as_deref()
            .or(self.detail.as_deref())
            .or(self.description.as_deref())
            .map(str::trim)
            .filter(|detail| !detail.is_empty())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Odds {
    pub details: Option<String>,
    #[serde(deserialize_with = "deser_flex_f64")]
    pub spread: Option<f64>,
}

// Deserializes each event on its own, dropping the malformed ones, so a
// single bad event never takes the rest of the payload down with it.
fn deser_event_list<'de, D>(deserializer: D) -> Result<Vec<Event>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match Event::deserialize(value) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!("Dropping malformed event: {e}");
                None
            }
        })
        .collect())
}

// Deserialize normally, but use the value's default if an error occurs.
// Goes through a `Value` so the raw input is always fully consumed.
fn deser_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

// Accepts a string or a number, yielding its string form
fn deser_flex_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer).unwrap_or_default();
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

// Accepts a number or a numeric string
fn deser_flex_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer).unwrap_or_default();
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn deser_flex_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer).unwrap_or_default();
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deser_tolerates_partial_events() {
        let payload: ScoreboardResponse = serde_json::from_str(
            r#"{
                "leagues": [{"logos": [{"href": "https://example.com/nfl.png"}]}],
                "events": [
                    {"id": 401547000, "date": "2026-08-27T23:00Z"},
                    {"unknownField": true}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.league_logo_url(), Some("https://example.com/nfl.png"));
        assert_eq!(payload.events.len(), 2);
        assert_eq!(payload.events[0].id.as_deref(), Some("401547000"));
        assert!(payload.events[1].id.is_none());
    }

    #[test]
    fn test_deser_drops_only_the_malformed_event() {
        // The second event's date is the wrong type entirely; it gets
        // dropped alone while its neighbors survive.
        let payload: ScoreboardResponse = serde_json::from_str(
            r#"{
                "events": [
                    {"id": "1", "date": "2026-08-27T23:00Z"},
                    {"id": "2", "date": 20260827, "status": {"type": {"state": 3}}},
                    {"id": "3", "date": "2026-08-27T20:00Z"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.events.len(), 2);
        assert_eq!(payload.events[0].id.as_deref(), Some("1"));
        assert_eq!(payload.events[1].id.as_deref(), Some("3"));
    }

    #[test]
    fn test_deser_flexible_fields() {
        let competitor: Competitor = serde_json::from_str(
            r#"{
                "homeAway": "home",
                "score": 24,
                "curatedRank": {"current": "12"},
                "conferenceId": "8",
                "team": {"abbreviation": "BUF", "groups": {"not": "a list"}}
            }"#,
        )
        .unwrap();
        assert_eq!(competitor.score.as_deref(), Some("24"));
        assert_eq!(competitor.curated_rank.unwrap().current, Some(12));
        assert_eq!(competitor.conference_id, Some(8));
        assert!(competitor.team.groups.is_empty());
    }

    #[test]
    fn test_status_best_detail() {
        let status: Status = serde_json::from_str(
            r#"{"period": 3, "displayClock": "4:12", "type": {"state": "in", "detail": "3rd Quarter"}}"#,
        )
        .unwrap();
        assert_eq!(status.period, Some(3));
        assert_eq!(status.kind.best_detail(), Some("3rd Quarter"));
    }
}
