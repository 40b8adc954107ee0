use chrono::{Local, NaiveDate};
use clap::Subcommand;
use flow_core::{
    format_focus_time, format_total, week_total, Config, ContributionGrid, DailyReport,
    TimeOfDay, WeekCursor,
};
use serde::Serialize;

use super::{open_store, print_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Contribution grid and total for a week
    Week {
        /// Weeks relative to the current one (-1 is last week)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summary of a single day
    Day {
        /// Day to report (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Every recorded session as JSON
    Sessions,
}

#[derive(Serialize)]
struct WeekSummary<'a> {
    range: String,
    total_seconds: u64,
    total: String,
    grid: &'a ContributionGrid,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = open_store()?;
    let sessions = store.sessions();

    match action {
        StatsAction::Week { offset, json } => {
            let cursor = WeekCursor::containing(&Local::now(), config.history.week_starts_on)
                .offset(offset);
            let grid = ContributionGrid::aggregate(sessions, cursor.start());
            let total = week_total(sessions, cursor.start());

            if json {
                print_json(&WeekSummary {
                    range: cursor.range_label(),
                    total_seconds: total,
                    total: format_focus_time(total),
                    grid: &grid,
                })?;
            } else {
                println!("{}  ({})", cursor.range_label(), format_focus_time(total));
                print!("{}", grid.render_ascii());
                for day in 0..7 {
                    for time_of_day in TimeOfDay::ALL {
                        let Some(stat) = grid.cell(day, time_of_day) else {
                            continue;
                        };
                        if stat.count > 0 {
                            println!(
                                "  {:<22} {} session(s), {}",
                                stat.title(),
                                stat.count,
                                format_total(stat.duration)
                            );
                        }
                    }
                }
            }
        }
        StatsAction::Day { date, json } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let report = DailyReport::build(sessions, date, &Local, &config.tag_catalog());

            if json {
                print_json(&report)?;
            } else {
                println!("{}", date.format("%A, %b %-d %Y"));
                println!("  sessions:  {}", report.count);
                println!("  total:     {}", format_total(report.total_duration));
                println!("  average:   {}m", report.average_minutes);
                if let Some(hour) = report.busiest_hour() {
                    println!("  busiest:   {hour:02}:00");
                }
                for share in &report.by_tag {
                    println!(
                        "  {:<10} {:>3} ({:.0}%)",
                        share.tag,
                        share.count,
                        share.share * 100.0
                    );
                }
            }
        }
        StatsAction::Sessions => {
            print_json(&sessions)?;
        }
    }
    Ok(())
}
