//! NCAA inclusion filtering.
//!
//! The filter precedence is fixed: an explicit team allow-list overrides a
//! conference allow-list, which overrides top-25-only, which overrides
//! "show everything". [`NcaaScope`] encodes that precedence by construction
//! so the client-side filter and the upstream `groups` query parameter can
//! never disagree.

use crate::{
    config::NcaaFilters,
    game::GameEntry,
    league::{LeagueDefinition, NcaaKind, conference_id, normalize_name},
};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NcaaScope {
    /// Only games involving one of these team abbreviations.
    Teams(HashSet<String>),
    /// Only games involving one of these conferences, matched by id or by
    /// normalized name.
    Conferences {
        ids: HashSet<u32>,
        names: HashSet<String>,
    },
    /// Only games with a top-25 team on either side.
    Top25,
    All,
}

impl NcaaScope {
    pub fn for_league(filters: &NcaaFilters, kind: NcaaKind) -> Self {
        let teams: HashSet<String> = filters
            .teams(kind)
            .iter()
            .map(|team| team.trim().to_uppercase())
            .filter(|team| !team.is_empty())
            .collect();
        if !teams.is_empty() {
            return Self::Teams(teams);
        }

        let conference_names = filters.conferences(kind);
        if !conference_names.is_empty() {
            let ids = conference_names
                .iter()
                .filter_map(|name| conference_id(kind, name))
                .collect();
            let names = conference_names
                .iter()
                .map(|name| normalize_name(name))
                .collect();
            return Self::Conferences { ids, names };
        }

        if filters.top25_only {
            return Self::Top25;
        }
        Self::All
    }

    pub fn allows(&self, game: &GameEntry) -> bool {
        match self {
            Self::Teams(teams) => {
                teams.contains(&game.away_abbr.to_uppercase())
                    || teams.contains(&game.home_abbr.to_uppercase())
            }
            Self::Conferences { ids, names } => {
                let id_match = game.away_conf.is_some_and(|conf| ids.contains(&conf))
                    || game.home_conf.is_some_and(|conf| ids.contains(&conf));
                let name_match = [&game.away_conf_name, &game.home_conf_name]
                    .into_iter()
                    .flatten()
                    .any(|name| names.contains(&normalize_name(name)));
                id_match || name_match
            }
            Self::Top25 => {
                game.away_rank.is_some_and(|rank| rank <= 25)
                    || game.home_rank.is_some_and(|rank| rank <= 25)
            }
            Self::All => true,
        }
    }

    /// The `groups` query parameter matching this scope. Top-25 queries the
    /// whole feed; everything else stays inside the league's default group.
    pub fn groups_param(&self, league: &LeagueDefinition) -> Option<&'static str> {
        match self {
            Self::Top25 => None,
            Self::Teams(_) | Self::Conferences { .. } | Self::All => league.default_group,
        }
    }
}
