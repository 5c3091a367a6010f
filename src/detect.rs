//! New-entry detection for the one-shot entrance animation.
//!
//! Each browser session tracks which match identity keys it has already
//! rendered. A refresh diffs the current key set against that state to
//! decide which cards animate in; the stored set is then replaced
//! wholesale, so a row that disappears and later reappears with the same
//! key animates again.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::models::EntryKey;

/// Seen-key state for one browser session.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    seen: HashSet<EntryKey>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `current` against the seen set, returning the newly appeared
    /// keys, then replace the seen set with `current`. Not a union:
    /// vanished keys are forgotten.
    pub fn observe(&mut self, current: &[EntryKey]) -> HashSet<EntryKey> {
        let current: HashSet<EntryKey> = current.iter().cloned().collect();
        let new = current.difference(&self.seen).cloned().collect();
        self.seen = current;
        new
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// How long a session may sit idle before its detector is dropped.
const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(600);

/// Hard cap on tracked sessions; the stalest are evicted beyond this.
const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Per-session detectors, keyed by session cookie value.
///
/// Sessions never interact; the map only exists so each browser gets an
/// independent animation state. Cookie-less clients (pollers, health
/// checks) mint a fresh session on every hit, so the store evicts idle
/// sessions and caps its size instead of growing for the process
/// lifetime. An evicted session that comes back simply animates as if
/// new.
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<String, SessionEntry>,
    idle_ttl: Duration,
    max_sessions: usize,
}

#[derive(Debug)]
struct SessionEntry {
    detector: ChangeDetector,
    last_seen: Instant,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Run one observation for `session`, creating its detector on first
    /// sight and refreshing its idle clock.
    pub fn observe(&mut self, session: &str, current: &[EntryKey]) -> HashSet<EntryKey> {
        self.sweep();

        let entry = self
            .sessions
            .entry(session.to_string())
            .or_insert_with(|| SessionEntry {
                detector: ChangeDetector::new(),
                last_seen: Instant::now(),
            });
        entry.last_seen = Instant::now();
        entry.detector.observe(current)
    }

    /// Drop idle sessions, then enforce the size cap stalest-first.
    fn sweep(&mut self) {
        let idle_ttl = self.idle_ttl;
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() < idle_ttl);

        while self.sessions.len() >= self.max_sessions {
            let stalest = self
                .sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(session, _)| session.clone());
            match stalest {
                Some(session) => {
                    self.sessions.remove(&session);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
