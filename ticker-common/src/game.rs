//! The normalized game record and the per-event parse step.
//!
//! A [`GameEntry`] is built once from an upstream event and never mutated
//! afterwards; every refresh cycle replaces the whole set. Events that
//! cannot produce an entry yield an explicit [`EventSkip`] so callers can
//! log and drop them without aborting the league or the cycle.

use crate::{
    league::LeagueDefinition,
    scoreboard::{Competitor, Event, Odds},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use displaydoc::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Upcoming,
    Live,
    Final,
}

impl GameState {
    fn from_upstream(state: &str) -> Self {
        match state {
            "in" => Self::Live,
            "post" => Self::Final,
            _ => Self::Upcoming,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Live => "LIVE",
            Self::Final => "FINAL",
        }
    }
}

/// Why an upstream event produced no [`GameEntry`].
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSkip {
    /// event carries no competition
    NoCompetition,
    /// competition lists fewer than two competitors
    MissingCompetitors,
    /// event date is missing or unparseable
    BadDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameEntry {
    pub event_id: String,
    pub league_key: &'static str,
    pub state: GameState,
    pub start_local: DateTime<Tz>,
    pub short_status: String,
    pub away_abbr: String,
    pub home_abbr: String,
    pub away_score: String,
    pub home_score: String,
    pub live_period_label: String,
    pub live_clock: String,
    pub away_rank: Option<u32>,
    pub home_rank: Option<u32>,
    pub away_conf: Option<u32>,
    pub home_conf: Option<u32>,
    pub away_conf_name: Option<String>,
    pub home_conf_name: Option<String>,
    pub away_logo_url: Option<String>,
    pub home_logo_url: Option<String>,
    pub spread_text: Option<String>,
}

impl GameEntry {
    pub fn from_event(
        event: &Event,
        league: &'static LeagueDefinition,
        tz: Tz,
    ) -> Result<Self, EventSkip> {
        let competition = event.competitions.first().ok_or(EventSkip::NoCompetition)?;
        if competition.competitors.len() < 2 {
            return Err(EventSkip::MissingCompetitors);
        }
        let away = find_competitor(&competition.competitors, "away")
            .ok_or(EventSkip::MissingCompetitors)?;
        let home = find_competitor(&competition.competitors, "home")
            .ok_or(EventSkip::MissingCompetitors)?;

        let date_text = event.date.as_deref().ok_or(EventSkip::BadDate)?;
        let start_utc = parse_event_datetime(date_text).ok_or(EventSkip::BadDate)?;
        let start_local = start_utc.with_timezone(&tz);

        let state = GameState::from_upstream(&event.status.kind.state);
        let short_status = event
            .status
            .kind
            .best_detail()
            .map(str::to_string)
            .unwrap_or_else(|| state.label().to_string());

        let (live_period_label, live_clock) = extract_period_and_clock(event);

        Ok(Self {
            event_id: event.id.clone().unwrap_or_default(),
            league_key: league.key,
            state,
            start_local,
            short_status,
            away_abbr: team_abbreviation(away),
            home_abbr: team_abbreviation(home),
            away_score: away.score.clone().unwrap_or_else(|| "0".to_string()),
            home_score: home.score.clone().unwrap_or_else(|| "0".to_string()),
            live_period_label,
            live_clock,
            away_rank: extract_rank(away),
            home_rank: extract_rank(home),
            away_conf: extract_conference_id(away),
            home_conf: extract_conference_id(home),
            away_conf_name: extract_conference_name(away),
            home_conf_name: extract_conference_name(home),
            away_logo_url: extract_logo_url(away),
            home_logo_url: extract_logo_url(home),
            spread_text: extract_spread(event),
        })
    }

    pub fn local_date(&self) -> NaiveDate {
        self.start_local.date_naive()
    }

    /// Start time as `H:MMa`/`H:MMp` (12-hour, no leading zero, single
    /// meridiem letter), e.g. `7:00P`.
    pub fn start_time_compact(&self) -> String {
        let (is_pm, hour) = self.start_local.hour12();
        format!(
            "{}:{:02}{}",
            hour,
            self.start_local.minute(),
            if is_pm { 'P' } else { 'A' }
        )
    }

    /// Spread reduced to a favored-team abbreviation plus signed line
    /// (`BUF -3.5`), `PK` for a pick'em, or `N/A` when absent.
    pub fn spread_compact(&self) -> String {
        let Some(raw) = self.spread_text.as_deref() else {
            return "N/A".to_string();
        };
        let text = raw.trim();
        let upper = text.to_uppercase();
        if text.is_empty() || upper == "N/A" || upper == "NONE" {
            return "N/A".to_string();
        }
        if upper.contains("PICK") || upper == "PK" {
            return "PK".to_string();
        }

        let Some((start, end)) = find_signed_number(text) else {
            return upper;
        };
        let mut line = text[start..end].to_string();
        if !line.starts_with('+') && !line.starts_with('-') {
            line.insert(0, '+');
        }

        let favored = favored_abbreviation(&text[..start], &self.away_abbr, &self.home_abbr);
        match favored {
            Some(abbr) => format!("{abbr} {line}"),
            None => line,
        }
    }
}

fn find_competitor<'a>(competitors: &'a [Competitor], side: &str) -> Option<&'a Competitor> {
    competitors
        .iter()
        .find(|c| c.home_away.eq_ignore_ascii_case(side))
        .or_else(|| competitors.first())
}

fn parse_event_datetime(value: &str) -> Option<DateTime<Utc>> {
    let text = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    // The upstream feed usually omits seconds ("2026-08-27T23:00Z").
    let stripped = text.strip_suffix('Z').unwrap_or(text);
    NaiveDateTime::parse_from_str(stripped, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

fn team_abbreviation(competitor: &Competitor) -> String {
    let team = &competitor.team;
    [
        team.abbreviation.as_deref(),
        team.short_display_name.as_deref(),
        team.display_name.as_deref(),
        team.name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|name| !name.is_empty())
    .map(str::to_uppercase)
    .unwrap_or_else(|| "TEAM".to_string())
}

fn extract_rank(competitor: &Competitor) -> Option<u32> {
    let curated = competitor
        .curated_rank
        .as_ref()
        .and_then(|rank| rank.current)
        .filter(|&rank| rank > 0);
    curated.or(competitor.rank.filter(|&rank| rank > 0))
}

fn extract_conference_id(competitor: &Competitor) -> Option<u32> {
    competitor
        .team
        .conference_id
        .or(competitor.conference_id)
        .or_else(|| competitor.team.groups.first().and_then(|group| group.id))
}

fn extract_conference_name(competitor: &Competitor) -> Option<String> {
    competitor
        .team
        .conference
        .as_ref()
        .and_then(|conf| conf.best_name())
        .or_else(|| {
            competitor
                .team
                .groups
                .first()
                .and_then(|group| group.best_name())
        })
        .map(str::to_string)
}

fn extract_logo_url(competitor: &Competitor) -> Option<String> {
    let team = &competitor.team;
    team.logos
        .first()
        .map(|logo| logo.href.clone())
        .filter(|href| !href.is_empty())
        .or_else(|| team.logo.clone().filter(|href| !href.is_empty()))
}

fn extract_spread(event: &Event) -> Option<String> {
    let sources = event
        .competitions
        .first()
        .map(|competition| competition.odds.as_slice())
        .into_iter()
        .chain(std::iter::once(event.odds.as_slice()));
    for source in sources {
        let Some(odds) = source.first() else { continue };
        if let Some(spread) = format_odds(odds) {
            return Some(spread);
        }
    }
    None
}

fn format_odds(odds: &Odds) -> Option<String> {
    if let Some(details) = odds.details.as_deref().filter(|text| !text.is_empty()) {
        return Some(details.to_string());
    }
    odds.spread.map(|spread| format!("{spread:+.1}"))
}

/// Byte range of the first `[+-]?digits[.digits]` run in `text`.
fn find_signed_number(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let signed = (bytes[i] == b'+' || bytes[i] == b'-')
            && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        if signed || bytes[i].is_ascii_digit() {
            let start = i;
            if signed {
                i += 1;
            }
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len()
                && bytes[i] == b'.'
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
            {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            return Some((start, i));
        }
        i += 1;
    }
    None
}

fn favored_abbreviation(favored_text: &str, away_abbr: &str, home_abbr: &str) -> Option<String> {
    let normalized: String = favored_text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { ' ' })
        .collect();
    let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }

    let away = away_abbr.to_uppercase();
    let home = home_abbr.to_uppercase();
    if !away.is_empty() && normalized.contains(&away) {
        return Some(away);
    }
    if !home.is_empty() && normalized.contains(&home) {
        return Some(home);
    }

    let tokens: Vec<&str> = normalized
        .split_whitespace()
        .filter(|token| !matches!(*token, "THE" | "OF" | "UNIVERSITY" | "STATE"))
        .collect();
    match tokens.as_slice() {
        [] => None,
        [only] => Some(only.chars().take(3).collect()),
        many => Some(
            many.iter()
                .take(3)
                .filter_map(|token| token.chars().next())
                .collect(),
        ),
    }
}

fn extract_period_and_clock(event: &Event) -> (String, String) {
    let short_detail = event
        .status
        .kind
        .best_detail()
        .unwrap_or_default()
        .to_uppercase();

    let mut period_label = event
        .status
        .period
        .filter(|&period| period > 0)
        .map(ordinal_label)
        .unwrap_or_default();

    // Fallback: an explicit period token in the short detail ("2ND", "3RD").
    if period_label.is_empty() {
        period_label = find_period_token(&short_detail).unwrap_or_default();
    }
    if period_label.is_empty() {
        if short_detail.contains("HALFTIME") {
            period_label = "HALF".to_string();
        } else if short_detail.contains("OT") {
            period_label = "OT".to_string();
        } else if short_detail.contains("LIVE") {
            period_label = "LIVE".to_string();
        }
    }

    let mut clock = event
        .status
        .display_clock
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_string();
    if clock.is_empty() {
        clock = find_clock_token(&short_detail).unwrap_or_default();
    }
    // Trailing all-zero clocks are noise.
    if matches!(clock.as_str(), "0:00" | "00:00" | "0:00.0" | "00:00.0") {
        clock.clear();
    }

    (period_label, clock)
}

pub fn ordinal_label(value: u32) -> String {
    let suffix = if (10..=20).contains(&(value % 100)) {
        "TH"
    } else {
        match value % 10 {
            1 => "ST",
            2 => "ND",
            3 => "RD",
            _ => "TH",
        }
    };
    format!("{value}{suffix}")
}

fn find_period_token(text: &str) -> Option<String> {
    for token in text.split(|c: char| !c.is_ascii_alphanumeric()) {
        for suffix in ["ST", "ND", "RD", "TH"] {
            if let Some(digits) = token.strip_suffix(suffix) {
                if !digits.is_empty()
                    && digits.len() <= 2
                    && digits.bytes().all(|b| b.is_ascii_digit())
                {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}

fn find_clock_token(text: &str) -> Option<String> {
    for token in text.split_whitespace() {
        let Some((minutes, rest)) = token.split_once(':') else {
            continue;
        };
        if minutes.is_empty() || minutes.len() > 2 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let seconds = rest.split('.').next().unwrap_or(rest);
        let tenths_ok = match rest.split_once('.') {
            None => true,
            Some((_, tenths)) => tenths.len() == 1 && tenths.bytes().all(|b| b.is_ascii_digit()),
        };
        if seconds.len() == 2 && seconds.bytes().all(|b| b.is_ascii_digit()) && tenths_ok {
            return Some(token.to_string());
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::league::league_by_key;

    fn event_from_json(json: &str) -> Event {
        serde_json::from_str(json).unwrap()
    }

    fn nfl() -> &'static LeagueDefinition {
        league_by_key("nfl").unwrap()
    }

    const UPCOMING_EVENT: &str = r#"{
        "id": "401",
        "date": "2026-08-27T23:00Z",
        "status": {"type": {"state": "pre", "shortDetail": "8/27 - 7:00 PM EDT"}},
        "competitions": [{
            "competitors": [
                {"homeAway": "away", "team": {"abbreviation": "NYJ"}},
                {"homeAway": "home", "team": {"abbreviation": "BUF"}}
            ],
            "odds": [{"details": "BUF -3.5"}]
        }]
    }"#;

    #[test]
    fn test_parse_upcoming_event() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let game = GameEntry::from_event(&event_from_json(UPCOMING_EVENT), nfl(), tz).unwrap();
        assert_eq!(game.state, GameState::Upcoming);
        assert_eq!(game.away_abbr, "NYJ");
        assert_eq!(game.home_abbr, "BUF");
        assert_eq!(game.start_time_compact(), "7:00P");
        assert_eq!(game.spread_compact(), "BUF -3.5");
        assert_eq!(game.local_date(), NaiveDate::from_ymd_opt(2026, 8, 27).unwrap());
    }

    #[test]
    fn test_parse_skips() {
        let tz = chrono_tz::UTC;
        let no_comp = event_from_json(r#"{"id": "1"}"#);
        assert_eq!(
            GameEntry::from_event(&no_comp, nfl(), tz),
            Err(EventSkip::NoCompetition)
        );

        let one_team = event_from_json(
            r#"{"id": "1", "date": "2026-08-27T23:00Z",
                "competitions": [{"competitors": [{"homeAway": "home", "team": {}}]}]}"#,
        );
        assert_eq!(
            GameEntry::from_event(&one_team, nfl(), tz),
            Err(EventSkip::MissingCompetitors)
        );

        let bad_date = event_from_json(
            r#"{"id": "1", "date": "soon",
                "competitions": [{"competitors": [
                    {"homeAway": "away", "team": {}}, {"homeAway": "home", "team": {}}
                ]}]}"#,
        );
        assert_eq!(
            GameEntry::from_event(&bad_date, nfl(), tz),
            Err(EventSkip::BadDate)
        );
    }

    #[test]
    fn test_live_period_and_clock() {
        let tz = chrono_tz::UTC;
        let event = event_from_json(
            r#"{
                "id": "2",
                "date": "2026-08-27T23:00:00Z",
                "status": {
                    "period": 2,
                    "displayClock": "11:04",
                    "type": {"state": "in", "shortDetail": "11:04 - 2nd Quarter"}
                },
                "competitions": [{"competitors": [
                    {"homeAway": "away", "score": "14", "team": {"abbreviation": "DAL"}},
                    {"homeAway": "home", "score": "10", "team": {"abbreviation": "PHI"}}
                ]}]
            }"#,
        );
        let game = GameEntry::from_event(&event, nfl(), tz).unwrap();
        assert_eq!(game.state, GameState::Live);
        assert_eq!(game.live_period_label, "2ND");
        assert_eq!(game.live_clock, "11:04");
        assert_eq!(game.away_score, "14");
    }

    #[test]
    fn test_zero_clock_suppressed() {
        let event = event_from_json(
            r#"{
                "id": "3",
                "date": "2026-08-27T23:00:00Z",
                "status": {"period": 4, "displayClock": "0:00", "type": {"state": "in"}},
                "competitions": [{"competitors": [
                    {"homeAway": "away", "team": {}}, {"homeAway": "home", "team": {}}
                ]}]
            }"#,
        );
        let game = GameEntry::from_event(&event, nfl(), chrono_tz::UTC).unwrap();
        assert_eq!(game.live_period_label, "4TH");
        assert_eq!(game.live_clock, "");
    }

    #[test]
    fn test_period_token_fallback() {
        let event = event_from_json(
            r#"{
                "id": "4",
                "date": "2026-08-27T23:00:00Z",
                "status": {"type": {"state": "in", "shortDetail": "Halftime"}},
                "competitions": [{"competitors": [
                    {"homeAway": "away", "team": {}}, {"homeAway": "home", "team": {}}
                ]}]
            }"#,
        );
        let game = GameEntry::from_event(&event, nfl(), chrono_tz::UTC).unwrap();
        assert_eq!(game.live_period_label, "HALF");
    }

    #[test]
    fn test_spread_compact_forms() {
        let tz = chrono_tz::UTC;
        let mut game = GameEntry::from_event(&event_from_json(UPCOMING_EVENT), nfl(), tz).unwrap();

        game.spread_text = None;
        assert_eq!(game.spread_compact(), "N/A");

        game.spread_text = Some("EVEN PICK".to_string());
        assert_eq!(game.spread_compact(), "PK");

        game.spread_text = Some("-2.5".to_string());
        assert_eq!(game.spread_compact(), "-2.5");

        game.spread_text = Some("3".to_string());
        assert_eq!(game.spread_compact(), "+3");

        game.spread_text = Some("Miami Dolphins -1.5".to_string());
        assert_eq!(game.spread_compact(), "MD -1.5");
    }

    #[test]
    fn test_ordinal_label() {
        assert_eq!(ordinal_label(1), "1ST");
        assert_eq!(ordinal_label(2), "2ND");
        assert_eq!(ordinal_label(3), "3RD");
        assert_eq!(ordinal_label(4), "4TH");
        assert_eq!(ordinal_label(11), "11TH");
        assert_eq!(ordinal_label(22), "22ND");
    }
}
