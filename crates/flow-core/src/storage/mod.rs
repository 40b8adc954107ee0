mod config;
pub mod database;
mod session_store;

pub use config::{Config, HistoryConfig, LogConfig, TimerConfig};
pub use database::Database;
pub use session_store::{SessionStore, DURATION_KEYS, SESSIONS_KEY};

use std::path::PathBuf;

use crate::error::DatabaseError;

/// Minimal key/value contract the session store persists through.
pub trait KeyValueStore {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;

    /// Insert or replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
}

/// Returns the data directory, creating it when missing.
///
/// `FLOW_DATA_DIR` overrides the location. Otherwise `~/.config/flow/`, or
/// `~/.config/flow-dev/` when `FLOW_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("FLOW_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FLOW_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("flow-dev")
            } else {
                base_dir.join("flow")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
