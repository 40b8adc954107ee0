//! Week navigation for history views.

use chrono::{DateTime, Datelike, Days, Duration, NaiveTime, TimeZone, Weekday};
use std::fmt;

/// Midnight of the latest `first_weekday` on or before `instant`, in
/// `instant`'s time zone.
pub fn start_of_week<Tz: TimeZone>(instant: &DateTime<Tz>, first_weekday: Weekday) -> DateTime<Tz> {
    let date = instant.date_naive();
    let back = (7 + date.weekday().num_days_from_monday() - first_weekday.num_days_from_monday()) % 7;
    let start_date = date - Days::new(u64::from(back));
    let midnight = start_date.and_time(NaiveTime::MIN);
    let tz = instant.timezone();
    tz.from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// The week currently on display.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekCursor<Tz: TimeZone> {
    start: DateTime<Tz>,
}

impl<Tz: TimeZone> WeekCursor<Tz> {
    pub fn new(start: DateTime<Tz>) -> Self {
        Self { start }
    }

    /// Week containing `now`.
    pub fn containing(now: &DateTime<Tz>, first_weekday: Weekday) -> Self {
        Self::new(start_of_week(now, first_weekday))
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    /// Move by `weeks` calendar weeks (negative goes back).
    pub fn offset(&self, weeks: i64) -> Self {
        let days = Days::new(weeks.unsigned_abs().saturating_mul(7));
        let moved = if weeks >= 0 {
            self.start.clone().checked_add_days(days)
        } else {
            self.start.clone().checked_sub_days(days)
        };
        let start = moved.unwrap_or_else(|| self.start.clone() + Duration::weeks(weeks));
        Self { start }
    }

    pub fn previous(&self) -> Self {
        self.offset(-1)
    }

    pub fn next(&self) -> Self {
        self.offset(1)
    }

    /// e.g. `"Mar 1 - Mar 7"`.
    pub fn range_label(&self) -> String
    where
        Tz::Offset: fmt::Display,
    {
        let last = self
            .start
            .clone()
            .checked_add_days(Days::new(6))
            .unwrap_or_else(|| self.start.clone() + Duration::days(6));
        format!(
            "{} - {}",
            self.start.format("%b %-d"),
            last.format("%b %-d")
        )
    }
}
