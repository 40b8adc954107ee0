//! # Flow Core Library
//!
//! This library provides the core business logic for the Flow focus timer.
//! Every operation is available through the `flow-cli` binary; graphical
//! front ends are thin layers over the same engine.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine cycling Focus, Short
//!   Break and Long Break. The caller invokes `tick()` periodically while the
//!   engine holds a tick subscription.
//! - **Storage**: SQLite key/value store for the session history and duration
//!   settings, TOML-based configuration
//! - **Stats**: Weekly contribution grid, week totals and daily reports
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SessionStore`]: Persistence of completed focus sessions
//! - [`ContributionGrid`]: 7 x 3 weekly aggregation of sessions
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use session::{FocusSession, Tag, TagCatalog};
pub use stats::{
    format_focus_time, format_total, start_of_week, week_total, CellStat, ContributionGrid,
    DailyReport, GridCell, TimeOfDay, WeekCursor,
};
pub use storage::{Config, Database, KeyValueStore, SessionStore};
pub use timer::{
    Clock, Durations, ManualClock, SystemClock, TickSubscription, TimerEngine, TimerMode,
    TimerState,
};
