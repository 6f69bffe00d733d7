//! Action tracing and session history
//!
//! [`ActionLoggerMiddleware`] emits a `tracing` event for each dispatched
//! action whose name passes an [`ActionFilter`], and can remember the most
//! recent ones in an [`ActionLog`] so a front end can print what a session
//! did.
//!
//! ```ignore
//! use dms_store::{ActionFilter, ActionLogConfig, ActionLoggerMiddleware};
//!
//! // Authentication traffic only, no history
//! let logger = ActionLoggerMiddleware::new(ActionFilter::parse(Some("Auth*,CurrentUser*"), None));
//!
//! // Everything but busy markers, last 100 kept
//! let logger = ActionLoggerMiddleware::with_log(ActionLogConfig::default());
//! ```

use std::collections::VecDeque;
use std::time::Instant;

use crate::action::ActionSummary;
use crate::store::Middleware;

/// Busy markers bracket every request and drown out everything else
const NOISY: &[&str] = &["AjaxCall*"];

/// Which action names get logged
///
/// Patterns are globs: `*` is any run of characters, `?` any one character.
/// An empty include list admits every name; excludes always win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for ActionFilter {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: NOISY.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ActionFilter {
    /// Admit every action, busy markers included
    pub fn everything() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Build from comma-separated lists, as given on a command line
    ///
    /// Without an exclude list the default exclusions apply.
    ///
    /// ```
    /// use dms_store::ActionFilter;
    ///
    /// let filter = ActionFilter::parse(Some("Documents*, RolesAdd"), Some("DocumentsLoad"));
    /// assert!(filter.admits("DocumentsDelete"));
    /// assert!(filter.admits("RolesAdd"));
    /// assert!(!filter.admits("DocumentsLoad"));
    /// assert!(!filter.admits("UsersLoad"));
    /// ```
    pub fn parse(include: Option<&str>, exclude: Option<&str>) -> Self {
        let list = |s: &str| -> Vec<String> {
            s.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect()
        };
        Self {
            include: include.map(list).unwrap_or_default(),
            exclude: exclude.map(list).unwrap_or_else(|| Self::default().exclude),
        }
    }

    pub fn admits(&self, name: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|p| glob_match(p, name));
        included && !self.exclude.iter().any(|p| glob_match(p, name))
    }
}

/// `*` and `?` glob over characters
pub fn glob_match(pattern: &str, text: &str) -> bool {
    fn go(p: &[char], t: &[char]) -> bool {
        match (p.split_first(), t.split_first()) {
            (None, _) => t.is_empty(),
            (Some(('*', rest)), _) => go(rest, t) || (!t.is_empty() && go(p, &t[1..])),
            (Some(_), None) => false,
            (Some((&pc, prest)), Some((&tc, trest))) => {
                (pc == '?' || pc == tc) && go(prest, trest)
            }
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    go(&p, &t)
}

/// One remembered action
#[derive(Debug, Clone)]
pub struct ActionLogEntry {
    /// Position in the session, counting only logged actions
    pub sequence: u64,
    pub name: &'static str,
    pub summary: String,
    pub at: Instant,
    /// Filled in once the reducer has run
    pub state_changed: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ActionLogConfig {
    pub capacity: usize,
    pub filter: ActionFilter,
}

impl Default for ActionLogConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            filter: ActionFilter::default(),
        }
    }
}

impl ActionLogConfig {
    pub fn new(capacity: usize, filter: ActionFilter) -> Self {
        Self { capacity, filter }
    }
}

/// Bounded history of admitted actions; the oldest entry goes first
#[derive(Debug, Clone)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    capacity: usize,
    filter: ActionFilter,
    recorded: u64,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(ActionLogConfig::default())
    }
}

impl ActionLog {
    pub fn new(config: ActionLogConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.capacity),
            capacity: config.capacity,
            filter: config.filter,
            recorded: 0,
        }
    }

    /// Remember `action` if the filter admits it
    pub fn record<A: ActionSummary>(&mut self, action: &A) -> bool {
        let name = action.name();
        if self.capacity == 0 || !self.filter.admits(name) {
            return false;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ActionLogEntry {
            sequence: self.recorded,
            name,
            summary: action.summary(),
            at: Instant::now(),
            state_changed: None,
        });
        self.recorded += 1;
        true
    }

    fn settle_last(&mut self, changed: bool) {
        if let Some(last) = self.entries.back_mut() {
            last.state_changed = Some(changed);
        }
    }

    /// Oldest first
    pub fn entries(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter()
    }

    /// Newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter().rev().take(count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone)]
pub struct ActionLoggerMiddleware {
    filter: ActionFilter,
    history: Option<ActionLog>,
    recorded_current: bool,
}

impl ActionLoggerMiddleware {
    /// Tracing only
    pub fn new(filter: ActionFilter) -> Self {
        Self {
            filter,
            history: None,
            recorded_current: false,
        }
    }

    /// Tracing plus history, both using the config's filter
    pub fn with_log(config: ActionLogConfig) -> Self {
        Self {
            filter: config.filter.clone(),
            history: Some(ActionLog::new(config)),
            recorded_current: false,
        }
    }

    pub fn log(&self) -> Option<&ActionLog> {
        self.history.as_ref()
    }

    pub fn filter(&self) -> &ActionFilter {
        &self.filter
    }
}

impl<A: ActionSummary> Middleware<A> for ActionLoggerMiddleware {
    fn before(&mut self, action: &A) {
        let name = action.name();
        if self.filter.admits(name) {
            tracing::debug!(action = %name, summary = %action.summary(), "action");
        }
        self.recorded_current = match self.history.as_mut() {
            Some(log) => log.record(action),
            None => false,
        };
    }

    fn after(&mut self, _action: &A, state_changed: bool) {
        if !self.recorded_current {
            return;
        }
        if let Some(log) = self.history.as_mut() {
            log.settle_last(state_changed);
        }
    }
}
