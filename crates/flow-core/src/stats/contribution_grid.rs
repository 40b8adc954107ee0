//! Weekly contribution grid.
//!
//! Buckets focus sessions into 7 day columns x 3 time-of-day rows for one
//! week, the data behind the history heatmap.

use chrono::{DateTime, Days, Duration, FixedOffset, SubsecRound, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::session::FocusSession;

pub const DAYS_PER_WEEK: usize = 7;
pub const BUCKETS_PER_DAY: usize = 3;

/// Part of the day a session finished in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// 05:00 - 11:59
    Morning = 0,
    /// 12:00 - 17:59
    Afternoon = 1,
    /// 18:00 - 04:59
    Evening = 2,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; BUCKETS_PER_DAY] =
        [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
        }
    }
}

/// Sessions that fell into one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub count: u32,
    /// Summed duration in seconds.
    pub total_duration: u64,
}

impl GridCell {
    /// Intensity step 0..=3 used to shade the cell.
    pub fn heat_level(&self) -> u8 {
        match self.count {
            0 => 0,
            1 => 1,
            2..=3 => 2,
            _ => 3,
        }
    }

    /// Get the character for ASCII heatmap visualization.
    pub fn heat_char(&self) -> char {
        match self.heat_level() {
            0 => '·',
            1 => '░',
            2 => '▒',
            _ => '█',
        }
    }
}

/// Hover summary of a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStat {
    /// Start of the cell's day.
    pub date: DateTime<FixedOffset>,
    pub time_of_day: TimeOfDay,
    pub count: u32,
    pub duration: u64,
}

impl CellStat {
    /// e.g. `"Mar 4 - Morning"`.
    pub fn title(&self) -> String {
        format!("{} - {}", self.date.format("%b %-d"), self.time_of_day.label())
    }
}

/// 7 x 3 aggregation of one week of sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionGrid {
    pub week_start: DateTime<FixedOffset>,
    /// Indexed by `[day offset][time of day]`.
    pub cells: [[GridCell; BUCKETS_PER_DAY]; DAYS_PER_WEEK],
}

impl ContributionGrid {
    /// Build the grid for the week starting at `week_start`.
    ///
    /// The week runs from `week_start` up to the same wall-clock time seven
    /// calendar days later; anything outside it is dropped. Column and row
    /// come from the session's calendar day and hour in `week_start`'s time
    /// zone, so weeks with a DST change still have seven whole days.
    pub fn aggregate<Tz: TimeZone>(sessions: &[FocusSession], week_start: &DateTime<Tz>) -> Self {
        let tz = week_start.timezone();
        let start = week_start.with_timezone(&Utc);
        let end = week_start
            .clone()
            .checked_add_days(Days::new(DAYS_PER_WEEK as u64))
            .map(|end| end.with_timezone(&Utc))
            .unwrap_or_else(|| start + Duration::days(DAYS_PER_WEEK as i64));
        let first_day = week_start.date_naive();
        let mut cells = [[GridCell::default(); BUCKETS_PER_DAY]; DAYS_PER_WEEK];

        for session in sessions.iter().filter(|s| s.date >= start && s.date < end) {
            let local = session.date.with_timezone(&tz);
            let day = (local.date_naive() - first_day).num_days();
            let Ok(day) = usize::try_from(day) else {
                continue;
            };
            if day >= DAYS_PER_WEEK {
                continue;
            }
            let cell = &mut cells[day][TimeOfDay::from_hour(local.hour()).index()];
            cell.count += 1;
            cell.total_duration += session.duration;
        }

        Self {
            week_start: week_start.fixed_offset(),
            cells,
        }
    }

    pub fn get(&self, day: usize, time_of_day: TimeOfDay) -> Option<&GridCell> {
        self.cells.get(day).map(|row| &row[time_of_day.index()])
    }

    /// Summary of one cell, `None` when `day` is outside the week.
    pub fn cell(&self, day: usize, time_of_day: TimeOfDay) -> Option<CellStat> {
        let cell = self.get(day, time_of_day)?;
        Some(CellStat {
            date: self.day_start(day),
            time_of_day,
            count: cell.count,
            duration: cell.total_duration,
        })
    }

    /// Start of column `day`, on the calendar.
    pub fn day_start(&self, day: usize) -> DateTime<FixedOffset> {
        self.week_start
            .checked_add_days(Days::new(day as u64))
            .unwrap_or(self.week_start)
    }

    pub fn total_count(&self) -> u32 {
        self.cells.iter().flatten().map(|c| c.count).sum()
    }

    /// Sum of all cell durations in seconds.
    pub fn total_duration(&self) -> u64 {
        self.cells.iter().flatten().map(|c| c.total_duration).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Multi-line heatmap: one column per day, one row per time of day.
    pub fn render_ascii(&self) -> String {
        let mut out = String::from("          ");
        for day in 0..DAYS_PER_WEEK {
            let label = self.day_start(day).format("%a").to_string();
            out.push_str(&format!("{label:<4}"));
        }
        out.push('\n');
        for time_of_day in TimeOfDay::ALL {
            out.push_str(&format!("{:<10}", time_of_day.label()));
            for row in &self.cells {
                let cell = row[time_of_day.index()];
                out.push_str(&format!("{:<4}", cell.heat_char()));
            }
            out.push('\n');
        }
        out
    }
}

/// Total focus seconds for the week starting at `week_start`.
///
/// The window runs from `week_start` through 23:59:59 of day 6, compared at
/// whole-second precision, so it ends one second before the grid's window.
pub fn week_total<Tz: TimeZone>(sessions: &[FocusSession], week_start: &DateTime<Tz>) -> u64 {
    let start = week_start.with_timezone(&Utc);
    let end = end_of_last_day(week_start);
    sessions
        .iter()
        .filter(|s| {
            let date = s.date.trunc_subsecs(0);
            date >= start && date <= end
        })
        .map(|s| s.duration)
        .sum()
}

fn end_of_last_day<Tz: TimeZone>(week_start: &DateTime<Tz>) -> DateTime<Utc> {
    let fallback = week_start.with_timezone(&Utc) + Duration::days(7) - Duration::seconds(1);
    let Some(last_day) = week_start.date_naive().checked_add_days(Days::new(6)) else {
        return fallback;
    };
    let Some(naive_end) = last_day.and_hms_opt(23, 59, 59) else {
        return fallback;
    };
    week_start
        .timezone()
        .from_local_datetime(&naive_end)
        .latest()
        .map(|end| end.with_timezone(&Utc))
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week_start() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 1, 0, 0, 0)
            .unwrap()
    }

    fn at(offset: Duration, duration: u64) -> FocusSession {
        FocusSession::new((week_start() + offset).with_timezone(&Utc), duration, "Dev")
    }

    #[test]
    fn time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(18), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Evening);
    }

    #[test]
    fn empty_history_gives_zero_grid() {
        let grid = ContributionGrid::aggregate(&[], &week_start());
        assert!(grid.is_empty());
        assert_eq!(grid.total_duration(), 0);
    }

    #[test]
    fn session_lands_in_day_and_bucket() {
        let sessions = vec![at(Duration::days(2) + Duration::minutes(9 * 60 + 30), 1500)];
        let grid = ContributionGrid::aggregate(&sessions, &week_start());
        let cell = grid.get(2, TimeOfDay::Morning).unwrap();
        assert_eq!(cell.count, 1);
        assert_eq!(cell.total_duration, 1500);
        assert_eq!(grid.total_count(), 1);
    }

    #[test]
    fn hour_uses_week_start_zone() {
        // 13:30 at +02:00 is 11:30 UTC: afternoon locally.
        let sessions = vec![at(Duration::minutes(13 * 60 + 30), 600)];
        let grid = ContributionGrid::aggregate(&sessions, &week_start());
        assert_eq!(grid.get(0, TimeOfDay::Afternoon).unwrap().count, 1);
        assert_eq!(grid.get(0, TimeOfDay::Morning).unwrap().count, 0);
    }

    #[test]
    fn sessions_outside_week_are_dropped() {
        let sessions = vec![
            at(-Duration::seconds(1), 100),
            at(Duration::days(7), 100),
            at(Duration::days(7) - Duration::seconds(1), 100),
        ];
        let grid = ContributionGrid::aggregate(&sessions, &week_start());
        assert_eq!(grid.total_count(), 1);
        assert_eq!(grid.get(6, TimeOfDay::Evening).unwrap().count, 1);
    }

    #[test]
    fn cell_stat_title() {
        let sessions = vec![at(Duration::days(3) + Duration::hours(20), 1500)];
        let grid = ContributionGrid::aggregate(&sessions, &week_start());
        let stat = grid.cell(3, TimeOfDay::Evening).unwrap();
        assert_eq!(stat.title(), "Mar 4 - Evening");
        assert_eq!(stat.count, 1);
        assert!(grid.cell(7, TimeOfDay::Morning).is_none());
    }

    #[test]
    fn heat_levels_follow_counts() {
        let level = |count| GridCell { count, total_duration: 0 }.heat_level();
        assert_eq!(level(0), 0);
        assert_eq!(level(1), 1);
        assert_eq!(level(2), 2);
        assert_eq!(level(3), 2);
        assert_eq!(level(4), 3);
    }

    #[test]
    fn week_total_boundaries() {
        let sessions = vec![
            at(Duration::zero(), 10),
            at(Duration::days(7) - Duration::seconds(1), 20),
            at(Duration::days(7) - Duration::milliseconds(500), 40),
            at(Duration::days(7), 80),
            at(-Duration::seconds(1), 160),
        ];
        assert_eq!(week_total(&sessions, &week_start()), 70);
    }

    #[test]
    fn render_ascii_has_header_and_three_rows() {
        let grid = ContributionGrid::aggregate(&[at(Duration::hours(9), 60)], &week_start());
        let text = grid.render_ascii();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Sun"));
        assert!(lines[1].starts_with("Morning"));
        assert!(lines[1].contains('░'));
    }
}
