pub mod config;
pub mod durations;
pub mod stats;
pub mod tags;
pub mod timer;

use std::sync::Arc;

use flow_core::{Config, Database, SessionStore, SystemClock, TimerEngine};

/// Session store over the database in the data directory.
pub fn open_store() -> Result<SessionStore, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(SessionStore::new(Box::new(db)))
}

/// Fresh idle engine on the wall clock, using the configured tag catalog.
pub fn open_engine(config: &Config) -> Result<TimerEngine, Box<dyn std::error::Error>> {
    let store = open_store()?;
    Ok(TimerEngine::new(
        store,
        Arc::new(SystemClock),
        config.tag_catalog(),
    ))
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
