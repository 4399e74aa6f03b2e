//! The ticker plugin: refresh orchestration and frame serving.
//!
//! `update()` rebuilds the entire ticker from scratch each cycle and only
//! commits the result when it produced at least one item; a cycle where
//! every league came back empty or failed leaves the previous ticker
//! scrolling untouched. `display()` serves one viewport frame per call and
//! advances the scroll cursor.

use crate::{
    cache::{Cache, scoreboard_cache_key},
    fetch::ScoreboardSource,
    logos::LogoCache,
};
use chrono::Utc;
use log::*;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::time::{Duration, Instant};
use ticker_common::{
    classify::{SectionCounts, Sections, classify},
    config::TickerConfig,
    filters::NcaaScope,
    game::{GameEntry, GameState},
    league::{LEAGUES, LeagueDefinition},
    scoreboard::ScoreboardResponse,
};
use ticker_drawing::{
    bitmap::Bitmap,
    items::{ItemStyle, Logo, game_card, league_header, section_label},
    ticker::{advance, compose, no_games_frame, remap_offset, viewport},
};

/// How stale a cached payload may be and still substitute for a failed
/// fetch.
const STALE_MAX_AGE: Duration = Duration::from_secs(86400);

/// Sink for rendered frames. Implementations drive real panels or the
/// terminal simulator.
pub trait DisplayDriver {
    fn show(&mut self, frame: &Bitmap);
    fn clear(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VegasDisplayMode {
    /// Continuous scroll through all items.
    Scroll,
    /// One item held per rotation slot.
    FixedSegment,
}

impl FromStr for VegasDisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scroll" => Ok(Self::Scroll),
            "fixed" | "fixed_segment" => Ok(Self::FixedSegment),
            other => Err(format!("unknown display mode '{other}'")),
        }
    }
}

/// Snapshot of the plugin's state for status reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginInfo {
    pub live_games: usize,
    pub enabled_leagues: Vec<&'static str>,
    pub league_game_counts: BTreeMap<&'static str, SectionCounts>,
}

pub struct TickerPlugin<S: ScoreboardSource, C: Cache> {
    id: String,
    config: TickerConfig,
    panel_width: u32,
    panel_height: u32,
    source: S,
    cache: C,
    logos: Option<LogoCache>,
    ticker: Option<Bitmap>,
    vegas_items: Vec<Bitmap>,
    games: BTreeMap<&'static str, Sections>,
    league_logo_urls: HashMap<&'static str, String>,
    live_games: usize,
    scroll_offset: u32,
    last_frame: Option<Instant>,
}

impl<S: ScoreboardSource, C: Cache> TickerPlugin<S, C> {
    pub fn new(
        id: impl Into<String>,
        config: TickerConfig,
        panel_width: u32,
        panel_height: u32,
        source: S,
        cache: C,
        logos: Option<LogoCache>,
    ) -> Self {
        Self {
            id: id.into(),
            config,
            panel_width,
            panel_height,
            source,
            cache,
            logos,
            ticker: None,
            vegas_items: Vec::new(),
            games: BTreeMap::new(),
            league_logo_urls: HashMap::new(),
            live_games: 0,
            scroll_offset: 0,
            last_frame: None,
        }
    }

    /// Fetches every enabled league and rebuilds the ticker. A cycle that
    /// produces no items at all keeps the previous ticker in place.
    pub fn update(&mut self) {
        let tz = self.config.refresh.resolve_timezone();
        let today = Utc::now().with_timezone(&tz).date_naive();
        let date_token = today.format("%Y%m%d").to_string();
        let style = ItemStyle::new(&self.config, self.panel_height);

        let mut new_items: Vec<Bitmap> = Vec::new();
        let mut new_games: BTreeMap<&'static str, Sections> = BTreeMap::new();
        let mut new_logo_urls: HashMap<&'static str, String> = HashMap::new();
        let mut live_games = 0;

        for league in &LEAGUES {
            if !self.config.leagues.enabled(league.key) {
                continue;
            }
            let scope = league
                .ncaa_kind
                .map(|kind| NcaaScope::for_league(&self.config.ncaa, kind));

            let mut params: BTreeMap<&'static str, String> = BTreeMap::new();
            params.insert("dates", date_token.clone());
            params.insert("limit", "500".to_string());
            if let Some(group) = scope.as_ref().and_then(|s| s.groups_param(league)) {
                params.insert("groups", group.to_string());
            }

            let Some(payload) = self.fetch_league_payload(league, &params, &date_token) else {
                continue;
            };
            if let Some(url) = payload.league_logo_url() {
                new_logo_urls.insert(league.key, url.to_string());
            }

            let games: Vec<GameEntry> = payload
                .events
                .iter()
                .filter_map(|event| match GameEntry::from_event(event, league, tz) {
                    Ok(game) => Some(game),
                    Err(skip) => {
                        debug!("Skipping {} event: {skip}", league.key);
                        None
                    }
                })
                .filter(|game| game.local_date() == today)
                .filter(|game| scope.as_ref().is_none_or(|s| s.allows(game)))
                .collect();

            let sections = classify(games, self.config.refresh.max_games_per_section);
            if sections.is_empty() {
                debug!("No games today for {}", league.key);
                continue;
            }
            live_games += sections.live.len();

            let header_url = new_logo_urls.get(league.key).cloned();
            self.append_league_items(
                &mut new_items,
                &style,
                league,
                &sections,
                header_url.as_deref(),
            );
            new_games.insert(league.key, sections);
        }

        // A cycle where everything failed or came back empty must not blank
        // a ticker that was showing games a moment ago.
        if new_items.is_empty() && !self.vegas_items.is_empty() {
            debug!("Refresh produced no items, keeping previous ticker");
            return;
        }

        let old_width = self.ticker.as_ref().map(Bitmap::width);
        let ticker = compose(
            &new_items,
            self.config.layout.item_spacing(),
            self.panel_width,
            self.panel_height,
        );
        self.scroll_offset = match (old_width, ticker.as_ref()) {
            (Some(old), Some(new)) => remap_offset(self.scroll_offset, old, new.width()),
            _ => 0,
        };
        self.ticker = ticker;
        self.vegas_items = new_items;
        self.games = new_games;
        self.league_logo_urls = new_logo_urls;
        self.live_games = live_games;
        info!(
            "Refreshed ticker: {} leagues, {} live games, width {:?}",
            self.games.len(),
            self.live_games,
            self.ticker.as_ref().map(Bitmap::width),
        );
    }

    fn append_league_items(
        &mut self,
        items: &mut Vec<Bitmap>,
        style: &ItemStyle,
        league: &'static LeagueDefinition,
        sections: &Sections,
        header_logo_url: Option<&str>,
    ) {
        let header_logo = self.load_logo(header_logo_url, style.header_logo_size);
        items.push(league_header(style, league.name, header_logo.as_ref()));

        for (state, games) in [
            (GameState::Live, &sections.live),
            (GameState::Upcoming, &sections.upcoming),
            (GameState::Final, &sections.finished),
        ] {
            if games.is_empty() {
                continue;
            }
            if self.config.layout.show_section_labels {
                items.push(section_label(style, state.label()));
            }
            for game in games {
                let logo_size = style.card_logo_size();
                let away = self.load_logo(game.away_logo_url.as_deref(), logo_size);
                let home = self.load_logo(game.home_logo_url.as_deref(), logo_size);
                items.push(game_card(style, game, away.as_ref(), home.as_ref()));
            }
        }
    }

    fn load_logo(&mut self, url: Option<&str>, size: u32) -> Option<Logo> {
        self.logos.as_mut().and_then(|logos| logos.load(url, size))
    }

    fn fetch_league_payload(
        &self,
        league: &'static LeagueDefinition,
        params: &BTreeMap<&'static str, String>,
        date_token: &str,
    ) -> Option<ScoreboardResponse> {
        let key = scoreboard_cache_key(&self.id, league.key, date_token, params);
        let fresh = Duration::from_secs(self.config.refresh.update_interval_secs.max(30));
        if let Some(raw) = self.cache.get(&key, fresh) {
            if let Ok(payload) = serde_json::from_str(&raw) {
                return Some(payload);
            }
        }

        match self.source.fetch(league, params) {
            Ok(payload) => {
                if let Ok(raw) = serde_json::to_string(&payload) {
                    self.cache.set(&key, &raw);
                }
                Some(payload)
            }
            Err(e) => {
                warn!("Scoreboard fetch failed for {}: {e}", league.key);
                let raw = self.cache.get(&key, STALE_MAX_AGE)?;
                match serde_json::from_str(&raw) {
                    Ok(payload) => {
                        info!("Using stale cached scoreboard for {}", league.key);
                        Some(payload)
                    }
                    Err(e) => {
                        debug!("Stale cache entry for {} is unparseable: {e}", league.key);
                        None
                    }
                }
            }
        }
    }

    /// Pushes one frame to the driver, advancing the scroll position.
    /// Returns `false` when there is no ticker content to scroll.
    pub fn display(&mut self, driver: &mut dyn DisplayDriver, force_clear: bool) -> bool {
        let Some(ticker) = self.ticker.as_ref() else {
            if force_clear {
                driver.clear();
            }
            let style = ItemStyle::new(&self.config, self.panel_height);
            driver.show(&no_games_frame(&style, self.panel_width));
            return false;
        };

        let frame_delay = Duration::from_millis(self.config.scrolling.frame_delay_ms);
        if let Some(last) = self.last_frame {
            if last.elapsed() < frame_delay {
                return true;
            }
        }

        if force_clear {
            driver.clear();
        }
        driver.show(&viewport(ticker, self.scroll_offset, self.panel_width));
        if self.config.scrolling.enabled {
            self.scroll_offset = advance(
                self.scroll_offset,
                self.config.scrolling.speed_px,
                ticker.width(),
            );
        }
        self.last_frame = Some(Instant::now());
        true
    }

    /// The rendered items of the last committed cycle.
    pub fn vegas_content(&self) -> Vec<Bitmap> {
        self.vegas_items.clone()
    }

    pub fn vegas_content_type(&self) -> &'static str {
        "multi"
    }

    pub fn vegas_display_mode(&self) -> VegasDisplayMode {
        self.config
            .vegas_mode
            .as_deref()
            .and_then(|mode| mode.parse().ok())
            .unwrap_or(VegasDisplayMode::Scroll)
    }

    pub fn supported_vegas_modes(&self) -> &'static [VegasDisplayMode] {
        &[VegasDisplayMode::Scroll, VegasDisplayMode::FixedSegment]
    }

    pub fn has_live_content(&self) -> bool {
        self.live_games > 0
    }

    /// The ticker loops continuously and has no natural end point, so the
    /// rotation host always moves on by its own timer.
    pub fn is_cycle_complete(&self) -> bool {
        false
    }

    pub fn supports_dynamic_duration(&self) -> bool {
        false
    }

    pub fn reset_cycle_state(&mut self) {
        self.scroll_offset = 0;
        self.last_frame = None;
    }

    pub fn info(&self) -> PluginInfo {
        PluginInfo {
            live_games: self.live_games,
            enabled_leagues: LEAGUES
                .iter()
                .filter(|league| self.config.leagues.enabled(league.key))
                .map(|league| league.key)
                .collect(),
            league_game_counts: self
                .games
                .iter()
                .map(|(key, sections)| (*key, sections.counts()))
                .collect(),
        }
    }

    /// Replaces the configuration and discards rendered state so the next
    /// update rebuilds everything under the new settings.
    pub fn on_config_change(&mut self, config: TickerConfig) {
        self.config = config;
        self.ticker = None;
        self.vegas_items.clear();
        self.games.clear();
        self.league_logo_urls.clear();
        self.live_games = 0;
        self.reset_cycle_state();
    }
}
