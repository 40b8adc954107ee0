use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Phase of the focus cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak];

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Focus)
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" => Ok(TimerMode::Focus),
            "short" | "short_break" | "short-break" | "shortbreak" => Ok(TimerMode::ShortBreak),
            "long" | "long_break" | "long-break" | "longbreak" => Ok(TimerMode::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("'{other}' is not one of focus, short, long"),
            }),
        }
    }
}

/// Configured minutes per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub focus: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus: 25,
            short_break: 5,
            long_break: 15,
        }
    }
}

impl Durations {
    /// Minutes configured for `mode`.
    pub fn minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }

    /// Duration of `mode` in milliseconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_ms(&self, mode: TimerMode) -> u64 {
        u64::from(self.minutes(mode))
            .saturating_mul(60)
            .saturating_mul(1000)
    }

    /// Duration of `mode` in seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        u64::from(self.minutes(mode)).saturating_mul(60)
    }

    /// Replace the minutes for `mode`. Non-positive values are ignored and
    /// `false` is returned.
    pub fn set(&mut self, mode: TimerMode, minutes: i64) -> bool {
        let Ok(minutes) = u32::try_from(minutes) else {
            return false;
        };
        if minutes == 0 {
            return false;
        }
        match mode {
            TimerMode::Focus => self.focus = minutes,
            TimerMode::ShortBreak => self.short_break = minutes,
            TimerMode::LongBreak => self.long_break = minutes,
        }
        true
    }
}
