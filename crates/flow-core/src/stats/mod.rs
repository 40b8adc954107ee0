//! Statistics module for Flow
//!
//! Aggregations over the recorded focus sessions: the weekly contribution
//! grid and week totals, week navigation, and the daily report.

mod contribution_grid;
mod daily_report;
mod week;

pub use contribution_grid::{
    week_total, CellStat, ContributionGrid, GridCell, TimeOfDay, BUCKETS_PER_DAY, DAYS_PER_WEEK,
};
pub use daily_report::{DailyReport, TagShare};
pub use week::{start_of_week, WeekCursor};

/// `"Hh Mm"` for a number of seconds.
pub fn format_focus_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours}h {minutes}m")
}

/// Like [`format_focus_time`] but drops the hours when there are none.
pub fn format_total(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
