use std::collections::HashMap;

use anyhow::Result;

use crate::provider::MatchDataProvider;
use crate::state::{Competition, Event, MatchRow};

/// Memoizing accessor over the remote provider. Competitions and match lists
/// are kept for the session; only one match's event table is held at a time,
/// replaced when a different match id is requested.
///
/// Provider errors pass through unmodified and leave the cache untouched, so
/// a later call retries the fetch.
pub struct EventStore {
    provider: Box<dyn MatchDataProvider>,
    competitions: Option<Vec<Competition>>,
    matches: HashMap<(u32, u32), Vec<MatchRow>>,
    events: Option<(u64, Vec<Event>)>,
}

impl EventStore {
    pub fn new(provider: Box<dyn MatchDataProvider>) -> Self {
        Self {
            provider,
            competitions: None,
            matches: HashMap::new(),
            events: None,
        }
    }

    pub fn competitions(&mut self) -> Result<&[Competition]> {
        if self.competitions.is_none() {
            let rows = self.provider.competitions()?;
            self.competitions = Some(rows);
        }
        Ok(self.competitions.as_deref().unwrap_or_default())
    }

    pub fn matches(&mut self, competition_id: u32, season_id: u32) -> Result<&[MatchRow]> {
        let key = (competition_id, season_id);
        if !self.matches.contains_key(&key) {
            let rows = self.provider.matches(competition_id, season_id)?;
            self.matches.insert(key, rows);
        }
        Ok(self
            .matches
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    pub fn match_events(&mut self, match_id: u64) -> Result<&[Event]> {
        let stale = match &self.events {
            Some((cached_id, _)) => *cached_id != match_id,
            None => true,
        };
        if stale {
            let rows = self.provider.events(match_id)?;
            self.events = Some((match_id, rows));
        }
        Ok(self
            .events
            .as_ref()
            .map(|(_, rows)| rows.as_slice())
            .unwrap_or_default())
    }

    /// Drops the cached event table so the next request refetches.
    pub fn invalidate_events(&mut self) {
        self.events = None;
    }

    pub fn cached_match_id(&self) -> Option<u64> {
        self.events.as_ref().map(|(id, _)| *id)
    }
}
