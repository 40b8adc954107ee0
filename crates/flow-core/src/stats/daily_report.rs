//! Per-day focus summary.

use chrono::{NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::session::{FocusSession, TagCatalog};

/// Sessions of one tag on the reported day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagShare {
    pub tag: String,
    pub count: u32,
    /// Fraction of the day's sessions, 0.0 ..= 1.0.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub count: u32,
    /// Seconds.
    pub total_duration: u64,
    /// Whole minutes per session, 0 when there were none.
    pub average_minutes: u64,
    /// Session count by local hour of completion.
    pub hourly: [u32; 24],
    /// Catalog order; tags without sessions are omitted.
    pub by_tag: Vec<TagShare>,
}

impl DailyReport {
    /// Summarize the sessions that finished on `date` in `tz`.
    pub fn build<Tz: TimeZone>(
        sessions: &[FocusSession],
        date: NaiveDate,
        tz: &Tz,
        catalog: &TagCatalog,
    ) -> Self {
        let mut hourly = [0u32; 24];
        let mut day_sessions = Vec::new();
        for session in sessions {
            let local = session.date.with_timezone(tz);
            if local.date_naive() != date {
                continue;
            }
            hourly[local.hour() as usize] += 1;
            day_sessions.push(session);
        }

        let count = day_sessions.len() as u32;
        let total_duration: u64 = day_sessions.iter().map(|s| s.duration).sum();
        let average_minutes = if count == 0 {
            0
        } else {
            total_duration / u64::from(count) / 60
        };

        let by_tag = catalog
            .tags()
            .iter()
            .filter_map(|tag| {
                let tag_count = day_sessions.iter().filter(|s| s.tag == tag.name).count() as u32;
                (tag_count > 0).then(|| TagShare {
                    tag: tag.name.clone(),
                    count: tag_count,
                    share: f64::from(tag_count) / f64::from(count),
                })
            })
            .collect();

        Self {
            date,
            count,
            total_duration,
            average_minutes,
            hourly,
            by_tag,
        }
    }

    /// Hour with the most sessions, earliest on ties.
    pub fn busiest_hour(&self) -> Option<u32> {
        let (hour, max) = self
            .hourly
            .iter()
            .enumerate()
            .fold((0usize, 0u32), |best, (h, &c)| if c > best.1 { (h, c) } else { best });
        (max > 0).then_some(hour as u32)
    }
}
