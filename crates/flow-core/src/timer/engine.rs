//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()`
//! periodically while the engine holds a tick subscription.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running
//!           |
//!           +-> (countdown reaches zero) -> Running in the next mode
//! ```
//!
//! Modes cycle Focus -> Short/Long Break -> Focus. A finished focus countdown
//! is recorded in the session store before the break starts.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(store, Arc::new(SystemClock), TagCatalog::default());
//! engine.start();
//! // In a loop:
//! if engine.active_subscription().is_some() {
//!     engine.tick(); // Returns Some(Event::TimerCompleted) when a countdown finishes
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::clock::Clock;
use super::mode::{Durations, TimerMode};
use crate::error::ValidationError;
use crate::events::Event;
use crate::session::{FocusSession, Tag, TagCatalog};
use crate::storage::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// The single outstanding request for ticks while a countdown runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSubscription {
    pub id: u64,
    /// Instant at which the countdown reaches zero.
    pub ends_at: DateTime<Utc>,
}

/// Core timer engine.
///
/// Operates on wall-clock deltas -- no internal thread.
pub struct TimerEngine {
    store: SessionStore,
    clock: Arc<dyn Clock>,
    catalog: TagCatalog,
    durations: Durations,
    mode: TimerMode,
    state: TimerState,
    /// Remaining time in milliseconds, as of the last tick.
    remaining_ms: u64,
    /// Fraction of the current duration still remaining.
    progress: f64,
    completed_focus_count: u32,
    selected_tag: Tag,
    subscription: Option<TickSubscription>,
    next_subscription_id: u64,
}

impl TimerEngine {
    /// Create an idle engine in Focus mode.
    ///
    /// Durations are read from `store` on top of the defaults; the selected
    /// tag is the first catalog entry.
    pub fn new(store: SessionStore, clock: Arc<dyn Clock>, catalog: TagCatalog) -> Self {
        let durations = store.load_durations(Durations::default());
        let selected_tag = catalog.first().clone();
        let mode = TimerMode::Focus;
        Self {
            remaining_ms: durations.duration_ms(mode),
            store,
            clock,
            catalog,
            durations,
            mode,
            state: TimerState::Idle,
            progress: 1.0,
            completed_focus_count: 0,
            selected_tag,
            subscription: None,
            next_subscription_id: 1,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Seconds left, with millisecond resolution.
    pub fn time_remaining_secs(&self) -> f64 {
        self.remaining_ms as f64 / 1000.0
    }

    /// 1.0 .. 0.0 fraction of the current duration remaining.
    pub fn progress(&self) -> f64 {
        self.progress.clamp(0.0, 1.0)
    }

    /// Remaining time as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        let secs = self.remaining_ms / 1000;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    /// Full duration of `mode` from the current configuration.
    pub fn duration_ms(&self, mode: TimerMode) -> u64 {
        self.durations.duration_ms(mode)
    }

    pub fn total_ms(&self) -> u64 {
        self.duration_ms(self.mode)
    }

    pub fn completed_focus_count(&self) -> u32 {
        self.completed_focus_count
    }

    pub fn selected_tag(&self) -> &Tag {
        &self.selected_tag
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    /// Every recorded session, oldest first.
    pub fn sessions(&self) -> &[FocusSession] {
        self.store.sessions()
    }

    pub fn active_subscription(&self) -> Option<&TickSubscription> {
        self.subscription.as_ref()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            state: self.state,
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms(),
            progress: self.progress(),
            formatted_time: self.formatted_time(),
            selected_tag: self.selected_tag.name.clone(),
            completed_focus_count: self.completed_focus_count,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state == TimerState::Running {
            return None;
        }
        let now = self.clock.now();
        self.begin_countdown(now);
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_ms: self.remaining_ms,
            at: now,
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.subscription = None;
        self.state = TimerState::Paused;
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_ms: self.remaining_ms,
            at: self.clock.now(),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.apply_reset();
        Some(Event::TimerReset {
            mode: self.mode,
            remaining_ms: self.remaining_ms,
            at: self.clock.now(),
        })
    }

    /// Focus: same as `reset()`. Breaks: jump to Focus and start it.
    pub fn skip(&mut self) -> Option<Event> {
        let from = self.mode;
        let now = self.clock.now();
        let started = if from == TimerMode::Focus {
            self.apply_reset();
            false
        } else {
            self.transition(TimerMode::Focus, now);
            true
        };
        Some(Event::TimerSkipped {
            from,
            to: self.mode,
            started,
            at: now,
        })
    }

    pub fn set_mode(&mut self, mode: TimerMode) -> Option<Event> {
        self.mode = mode;
        self.apply_reset();
        Some(Event::ModeChanged {
            mode,
            remaining_ms: self.remaining_ms,
            at: self.clock.now(),
        })
    }

    /// Change the configured minutes of `mode`. Non-positive values are
    /// ignored. An idle engine showing `mode` picks the value up at once.
    pub fn set_duration(&mut self, mode: TimerMode, minutes: i64) -> Option<Event> {
        if !self.durations.set(mode, minutes) {
            debug!(%mode, minutes, "rejected non-positive duration");
            return None;
        }
        if let Err(e) = self.store.save_durations(&self.durations) {
            warn!(error = %e, "failed to persist durations");
        }
        let applied = self.state == TimerState::Idle && self.mode == mode;
        if applied {
            self.apply_reset();
        }
        Some(Event::DurationChanged {
            mode,
            minutes: self.durations.minutes(mode),
            applied,
            at: self.clock.now(),
        })
    }

    /// Select the tag future focus sessions are recorded under.
    ///
    /// # Errors
    /// Returns `ValidationError::UnknownTag` if `name` is not in the catalog.
    pub fn select_tag(&mut self, name: &str) -> Result<Event, ValidationError> {
        let tag = self
            .catalog
            .find(name)
            .ok_or_else(|| ValidationError::UnknownTag(name.to_string()))?;
        self.selected_tag = tag.clone();
        Ok(Event::TagSelected {
            tag: self.selected_tag.name.clone(),
            at: self.clock.now(),
        })
    }

    /// Call periodically. Returns `Some(Event::TimerCompleted)` when the
    /// countdown finishes; the next mode is already running by then.
    pub fn tick(&mut self) -> Option<Event> {
        let ends_at = self.subscription.as_ref()?.ends_at;
        let now = self.clock.now();
        let remaining = ends_at - now;
        if remaining <= Duration::zero() {
            return Some(self.complete(now));
        }
        self.remaining_ms = u64::try_from(remaining.num_milliseconds()).unwrap_or(0);
        self.progress = self.remaining_ms as f64 / self.total_ms() as f64;
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_countdown(&mut self, now: DateTime<Utc>) {
        let remaining = i64::try_from(self.remaining_ms).unwrap_or(i64::MAX);
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.state = TimerState::Running;
        self.subscription = Some(TickSubscription {
            id,
            ends_at: now + Duration::milliseconds(remaining),
        });
    }

    fn apply_reset(&mut self) {
        self.subscription = None;
        self.state = TimerState::Idle;
        self.remaining_ms = self.total_ms();
        self.progress = 1.0;
    }

    /// Switch mode and start it without passing through an observable idle
    /// state.
    fn transition(&mut self, mode: TimerMode, now: DateTime<Utc>) {
        self.mode = mode;
        self.apply_reset();
        self.begin_countdown(now);
    }

    fn complete(&mut self, now: DateTime<Utc>) -> Event {
        self.subscription = None;
        let finished = self.mode;

        let (next_mode, session) = match finished {
            TimerMode::Focus => {
                let session = FocusSession::new(
                    now,
                    self.durations.duration_secs(TimerMode::Focus),
                    self.selected_tag.name.clone(),
                );
                if let Err(e) = self.store.append(session.clone()) {
                    error!(error = %e, "failed to persist focus session");
                }
                let before = self.completed_focus_count;
                self.completed_focus_count = before.saturating_add(1);
                let next = if before % 2 == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                };
                info!(
                    tag = %session.tag,
                    duration_secs = session.duration,
                    completed = self.completed_focus_count,
                    "focus session recorded"
                );
                (next, Some(session))
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => (TimerMode::Focus, None),
        };

        info!(finished = %finished, next = %next_mode, "timer finished");
        self.transition(next_mode, now);

        Event::TimerCompleted {
            mode: finished,
            next_mode,
            session,
            completed_focus_count: self.completed_focus_count,
            at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use crate::timer::clock::ManualClock;
    use chrono::TimeZone;

    fn engine() -> (TimerEngine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap(),
        ));
        let store = SessionStore::new(Box::new(Database::open_memory().unwrap()));
        let engine = TimerEngine::new(store, clock.clone(), TagCatalog::default());
        (engine, clock)
    }

    #[test]
    fn start_pause_resume() {
        let (mut engine, _clock) = engine();
        assert_eq!(engine.state(), TimerState::Idle);

        assert!(engine.start().is_some());
        assert_eq!(engine.state(), TimerState::Running);

        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), TimerState::Paused);
        assert!(engine.active_subscription().is_none());

        assert!(engine.start().is_some());
        assert_eq!(engine.state(), TimerState::Running);
    }

    #[test]
    fn new_engine_shows_full_focus_duration() {
        let (engine, _clock) = engine();
        assert_eq!(engine.mode(), TimerMode::Focus);
        assert_eq!(engine.remaining_ms(), 25 * 60 * 1000);
        assert_eq!(engine.progress(), 1.0);
        assert_eq!(engine.formatted_time(), "25:00");
        assert_eq!(engine.selected_tag().name, "Dev");
    }

    #[test]
    fn start_twice_keeps_one_subscription() {
        let (mut engine, _clock) = engine();
        engine.start();
        let first = *engine.active_subscription().unwrap();
        assert!(engine.start().is_none());
        assert_eq!(engine.active_subscription(), Some(&first));
    }

    #[test]
    fn pause_when_idle_is_noop() {
        let (mut engine, _clock) = engine();
        assert!(engine.pause().is_none());
        assert_eq!(engine.state(), TimerState::Idle);
    }

    #[test]
    fn tick_updates_remaining_and_progress() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(Duration::seconds(300));
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_ms(), 20 * 60 * 1000);
        assert!((engine.progress() - 0.8).abs() < 1e-9);
        assert_eq!(engine.formatted_time(), "20:00");
    }

    #[test]
    fn pause_freezes_last_computed_remaining() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(Duration::seconds(60));
        engine.tick();
        clock.advance(Duration::milliseconds(50));
        engine.pause();
        assert_eq!(engine.remaining_ms(), 24 * 60 * 1000);

        clock.advance(Duration::seconds(600));
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_ms(), 24 * 60 * 1000);

        engine.start();
        clock.advance(Duration::seconds(60));
        engine.tick();
        assert_eq!(engine.remaining_ms(), 23 * 60 * 1000);
    }

    #[test]
    fn tick_without_subscription_is_noop() {
        let (mut engine, clock) = engine();
        clock.advance(Duration::hours(2));
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_ms(), 25 * 60 * 1000);
    }

    #[test]
    fn reset_restores_full_duration() {
        let (mut engine, clock) = engine();
        engine.set_mode(TimerMode::ShortBreak);
        engine.start();
        clock.advance(Duration::seconds(100));
        engine.tick();
        engine.reset();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.mode(), TimerMode::ShortBreak);
        assert_eq!(engine.remaining_ms(), 5 * 60 * 1000);
        assert_eq!(engine.progress(), 1.0);
        assert!(engine.active_subscription().is_none());
    }

    #[test]
    fn skip_break_starts_focus() {
        let (mut engine, _clock) = engine();
        engine.set_mode(TimerMode::LongBreak);
        let event = engine.skip().unwrap();
        assert_eq!(engine.mode(), TimerMode::Focus);
        assert_eq!(engine.state(), TimerState::Running);
        assert!(matches!(event, Event::TimerSkipped { started: true, .. }));
    }

    #[test]
    fn set_duration_applies_when_idle_in_same_mode() {
        let (mut engine, _clock) = engine();
        let event = engine.set_duration(TimerMode::Focus, 40).unwrap();
        assert!(matches!(event, Event::DurationChanged { applied: true, minutes: 40, .. }));
        assert_eq!(engine.remaining_ms(), 40 * 60 * 1000);

        let event = engine.set_duration(TimerMode::LongBreak, 20).unwrap();
        assert!(matches!(event, Event::DurationChanged { applied: false, .. }));
        assert_eq!(engine.remaining_ms(), 40 * 60 * 1000);
    }

    #[test]
    fn set_duration_rejects_non_positive() {
        let (mut engine, _clock) = engine();
        assert!(engine.set_duration(TimerMode::Focus, 0).is_none());
        assert!(engine.set_duration(TimerMode::Focus, -5).is_none());
        assert_eq!(engine.durations().focus, 25);
    }

    #[test]
    fn set_duration_while_running_keeps_countdown() {
        let (mut engine, clock) = engine();
        engine.start();
        engine.set_duration(TimerMode::Focus, 50);
        assert_eq!(engine.state(), TimerState::Running);
        clock.advance(Duration::seconds(60));
        engine.tick();
        assert_eq!(engine.remaining_ms(), 24 * 60 * 1000);
        assert!((engine.progress() - 24.0 / 50.0).abs() < 1e-9);
    }

    #[test]
    fn select_unknown_tag_is_rejected() {
        let (mut engine, _clock) = engine();
        assert_eq!(
            engine.select_tag("Gym"),
            Err(ValidationError::UnknownTag("Gym".into()))
        );
        assert_eq!(engine.selected_tag().name, "Dev");
        engine.select_tag("Reading").unwrap();
        assert_eq!(engine.selected_tag().name, "Reading");
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let (engine, _clock) = engine();
        match engine.snapshot() {
            Event::StateSnapshot {
                mode,
                state,
                remaining_ms,
                formatted_time,
                ..
            } => {
                assert_eq!(mode, TimerMode::Focus);
                assert_eq!(state, TimerState::Idle);
                assert_eq!(remaining_ms, 25 * 60 * 1000);
                assert_eq!(formatted_time, "25:00");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
