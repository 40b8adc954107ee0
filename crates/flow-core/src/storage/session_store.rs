//! Durable session history and duration settings.
//!
//! Reads never fail: missing or malformed values are logged and replaced by
//! an empty history or the prior duration. Writes replace the whole value,
//! merged with what is stored at that moment.

use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::{CoreError, DatabaseError};
use crate::session::FocusSession;
use crate::timer::{Durations, TimerMode};

/// Key holding the JSON array of sessions.
pub const SESSIONS_KEY: &str = "focus_sessions";

/// Keys of the three duration settings, in `TimerMode::ALL` order.
pub const DURATION_KEYS: [(TimerMode, &str); 3] = [
    (TimerMode::Focus, "focus_duration"),
    (TimerMode::ShortBreak, "short_break_duration"),
    (TimerMode::LongBreak, "long_break_duration"),
];

/// Owner of the completed-session list.
pub struct SessionStore {
    backend: Box<dyn KeyValueStore>,
    sessions: Vec<FocusSession>,
}

impl SessionStore {
    /// Wrap `backend` and read the persisted history into memory.
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            backend,
            sessions: Vec::new(),
        };
        store.sessions = store.load();
        store
    }

    /// In-memory copy of every recorded session, oldest first.
    pub fn sessions(&self) -> &[FocusSession] {
        &self.sessions
    }

    /// Read the persisted sessions. Empty when absent or corrupt.
    pub fn load(&self) -> Vec<FocusSession> {
        let raw = match self.backend.get(SESSIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read session history, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<FocusSession>>(&raw) {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(error = %e, "stored session history is malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Append `session` and rewrite the full list.
    ///
    /// The stored list is re-read first so sessions written by another
    /// process since this store was opened are kept. The session is kept in
    /// memory even when the write fails.
    ///
    /// # Errors
    /// Returns an error if the list cannot be serialized or written.
    pub fn append(&mut self, session: FocusSession) -> Result<(), CoreError> {
        let mut merged = self.load();
        for known in &self.sessions {
            if !merged.iter().any(|s| s.id == known.id) {
                merged.push(known.clone());
            }
        }
        merged.push(session);
        self.sessions = merged;

        let json = serde_json::to_string(&self.sessions)?;
        self.backend.set(SESSIONS_KEY, &json)?;
        debug!(count = self.sessions.len(), "session history written");
        Ok(())
    }

    /// Read the duration settings on top of `prior`. Values that are
    /// missing, unparsable or not positive leave the prior value in place.
    pub fn load_durations(&self, prior: Durations) -> Durations {
        let mut durations = prior;
        for (mode, key) in DURATION_KEYS {
            let raw = match self.backend.get(key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key, error = %e, "failed to read duration setting");
                    continue;
                }
            };
            match raw.trim().parse::<i64>() {
                Ok(minutes) => {
                    if !durations.set(mode, minutes) {
                        debug!(key, minutes, "ignoring non-positive duration setting");
                    }
                }
                Err(e) => warn!(key, value = %raw, error = %e, "ignoring malformed duration setting"),
            }
        }
        durations
    }

    /// Persist all three duration settings.
    ///
    /// # Errors
    /// Returns an error if any of the writes fails.
    pub fn save_durations(&self, durations: &Durations) -> Result<(), DatabaseError> {
        for (mode, key) in DURATION_KEYS {
            self.backend.set(key, &durations.minutes(mode).to_string())?;
        }
        Ok(())
    }
}
