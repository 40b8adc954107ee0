use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::FocusSession;
use crate::timer::{TimerMode, TimerState};

/// Every state change of the timer engine produces an Event.
/// Presentation layers poll `snapshot()` and react to the events returned by
/// commands and ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerSkipped {
        from: TimerMode,
        to: TimerMode,
        /// Whether the new mode is already counting down.
        started: bool,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: TimerMode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    DurationChanged {
        mode: TimerMode,
        minutes: u32,
        /// Whether the running display picked the new value up immediately.
        applied: bool,
        at: DateTime<Utc>,
    },
    TagSelected {
        tag: String,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero. This is the "timer finished" notification;
    /// delivering it to the user is up to the presentation layer.
    TimerCompleted {
        mode: TimerMode,
        next_mode: TimerMode,
        /// Recorded session when a focus countdown finished.
        session: Option<FocusSession>,
        completed_focus_count: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        state: TimerState,
        remaining_ms: u64,
        total_ms: u64,
        progress: f64,
        formatted_time: String,
        selected_tag: String,
        completed_focus_count: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short name used in logs and terminal output.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerReset { .. } => "timer_reset",
            Event::TimerSkipped { .. } => "timer_skipped",
            Event::ModeChanged { .. } => "mode_changed",
            Event::DurationChanged { .. } => "duration_changed",
            Event::TagSelected { .. } => "tag_selected",
            Event::TimerCompleted { .. } => "timer_completed",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
