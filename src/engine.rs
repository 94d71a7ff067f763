use std::collections::HashSet;

use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, error, warn};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::grouping::{group_at, DateGroup};
use crate::index::{MatchMode, TitleIndex};
use crate::merge::{merge, MatchResult, RankedResult};
use crate::pipeline::{is_empty_query, select};
use crate::session::SessionMetadata;

/// Owns the current session snapshot and the title index built from it.
///
/// Replacing the snapshot rebuilds the index in the same call, so a query
/// never runs against an index built from an older snapshot.
pub struct HistorySearch {
    config: SearchConfig,
    sessions: Vec<SessionMetadata>,
    index: TitleIndex,
    generation: u64,
}

impl HistorySearch {
    /// Build an engine without checking `config`. A strategy whose settings
    /// Tantivy rejects logs a warning and contributes no matches.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            index: TitleIndex::new(config.max_edit_distance),
            config,
            sessions: Vec::new(),
            generation: 0,
        }
    }

    pub fn with_sessions(config: SearchConfig, sessions: Vec<SessionMetadata>) -> Self {
        let mut search = Self::new(config);
        search.replace_sessions(sessions);
        search
    }

    /// Like [`new`](Self::new), but rejects an out-of-range `config`.
    pub fn try_new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn try_with_sessions(config: SearchConfig, sessions: Vec<SessionMetadata>) -> Result<Self> {
        let mut search = Self::try_new(config)?;
        search.replace_sessions(sessions);
        Ok(search)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn sessions(&self) -> &[SessionMetadata] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Bumped on every snapshot replacement.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Install a new snapshot and rebuild the index from it.
    ///
    /// Later records repeating a session id are dropped. If the index cannot
    /// be built, searching continues against an empty index.
    pub fn replace_sessions(&mut self, sessions: Vec<SessionMetadata>) {
        let mut seen = HashSet::with_capacity(sessions.len());
        let mut unique = Vec::with_capacity(sessions.len());
        for session in sessions {
            if seen.insert(session.session_id.clone()) {
                unique.push(session);
            } else {
                warn!(session_id = %session.session_id, "dropping duplicate session");
            }
        }

        self.sessions = unique;
        self.generation += 1;

        match self.index.rebuild(&self.sessions) {
            Ok(indexed) => debug!(
                generation = self.generation,
                sessions = self.sessions.len(),
                indexed,
                "rebuilt title index"
            ),
            Err(e) => error!(
                generation = self.generation,
                error = %e,
                "title index rebuild failed, continuing with empty index"
            ),
        }
    }

    /// Drop every session, as after the store has been cleared.
    pub fn clear_sessions(&mut self) {
        self.replace_sessions(Vec::new());
    }

    /// Run the exact, fuzzy and prefix lookups and merge their hits.
    pub fn rank(&self, query: &str) -> Vec<RankedResult> {
        if is_empty_query(query) {
            return Vec::new();
        }
        let exact = self.lookup(query, MatchMode::Exact);
        let fuzzy = self.lookup(query, MatchMode::Fuzzy(self.config.fuzzy_tolerance));
        let prefix = self.lookup(query, MatchMode::Prefix(self.config.prefix_tolerance));
        merge(exact, fuzzy, prefix)
    }

    /// Matching sessions, newest first. An empty query returns every session.
    pub fn search(&self, query: &str) -> Vec<SessionMetadata> {
        let ranked = self.rank(query);
        let selected = select(&self.sessions, &ranked, query);
        debug!(query, ranked = ranked.len(), selected = selected.len(), "search");
        selected
    }

    /// [`search`](Self::search) grouped against the local clock.
    pub fn grouped(&self, query: &str) -> Vec<DateGroup> {
        self.grouped_at(query, &Local::now())
    }

    pub fn grouped_at<Tz: TimeZone>(&self, query: &str, now: &DateTime<Tz>) -> Vec<DateGroup> {
        group_at(self.search(query), now)
    }

    fn lookup(&self, query: &str, mode: MatchMode) -> Vec<MatchResult> {
        self.index.lookup(query, mode).unwrap_or_else(|e| {
            warn!(error = %e, "lookup failed, ignoring strategy");
            Vec::new()
        })
    }
}

impl Default for HistorySearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}
