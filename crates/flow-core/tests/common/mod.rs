//! Shared fixtures for flow-core integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use flow_core::{Database, FocusSession, ManualClock, SessionStore, Tag, TagCatalog, TimerEngine};

/// Sunday 2026-03-01 00:00 at UTC+02:00.
pub fn week_start() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 1, 0, 0, 0)
        .unwrap()
}

/// Session finishing `offset` after [`week_start`].
pub fn session_at(offset: Duration, duration: u64, tag: &str) -> FocusSession {
    FocusSession::new((week_start() + offset).with_timezone(&Utc), duration, tag)
}

/// Deterministic stand-in for a week of real usage: a varying number of
/// 25 minute sessions per day at morning, afternoon and evening hours.
pub fn sample_week() -> Vec<FocusSession> {
    let tags = Tag::defaults();
    let hours = [9, 14, 20];
    let mut sessions = Vec::new();
    for day in 0..7i64 {
        let per_day = (day * 3 + 1) % 6;
        for i in 0..per_day {
            let hour = hours[(i % 3) as usize] + (i / 3);
            let minute = (day * 7 + i * 11) % 60;
            let tag = &tags[((day + i) % tags.len() as i64) as usize];
            sessions.push(session_at(
                Duration::days(day) + Duration::hours(hour) + Duration::minutes(minute),
                25 * 60,
                &tag.name,
            ));
        }
    }
    sessions
}

/// Engine over an in-memory database with a clock stopped at `start`.
pub fn engine_at(start: DateTime<Utc>) -> (TimerEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start));
    let store = SessionStore::new(Box::new(Database::open_memory().unwrap()));
    let engine = TimerEngine::new(store, clock.clone(), TagCatalog::default());
    (engine, clock)
}

pub fn engine() -> (TimerEngine, Arc<ManualClock>) {
    engine_at(Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap())
}

/// US Eastern time with its 2026 transitions: clocks go 02:00 -> 03:00 on
/// Sunday 2026-03-08 and 02:00 -> 01:00 on Sunday 2026-11-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eastern;

const EST_SECS: i32 = -5 * 3600;
const EDT_SECS: i32 = -4 * 3600;

fn est() -> FixedOffset {
    FixedOffset::east_opt(EST_SECS).unwrap()
}

fn edt() -> FixedOffset {
    FixedOffset::east_opt(EDT_SECS).unwrap()
}

fn utc_at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

impl TimeZone for Eastern {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        Eastern
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let fits = |offset: FixedOffset| {
            let utc = *local - Duration::seconds(i64::from(offset.local_minus_utc()));
            self.offset_from_utc_datetime(&utc) == offset
        };
        match (fits(edt()), fits(est())) {
            (true, true) => LocalResult::Ambiguous(edt(), est()),
            (true, false) => LocalResult::Single(edt()),
            (false, true) => LocalResult::Single(est()),
            (false, false) => LocalResult::None,
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        if *utc >= utc_at(2026, 3, 8, 7) && *utc < utc_at(2026, 11, 1, 6) {
            edt()
        } else {
            est()
        }
    }
}

/// Session finishing at local wall-clock time in [`Eastern`].
pub fn eastern_session(
    (y, m, d): (i32, u32, u32),
    (h, min): (u32, u32),
    duration: u64,
) -> FocusSession {
    let local = Eastern
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .earliest()
        .unwrap();
    FocusSession::new(local.with_timezone(&Utc), duration, "Dev")
}
