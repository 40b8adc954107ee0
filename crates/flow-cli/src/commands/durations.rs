use clap::Subcommand;
use flow_core::{Durations, TimerMode};

use super::{open_store, print_json};

#[derive(Subcommand)]
pub enum DurationsAction {
    /// Show the configured minutes per mode
    Show,
    /// Change the minutes of one mode
    Set {
        /// focus, short or long
        mode: TimerMode,
        /// Minutes, greater than zero
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
}

pub fn run(action: DurationsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let mut durations = store.load_durations(Durations::default());

    match action {
        DurationsAction::Show => {
            print_json(&durations)?;
        }
        DurationsAction::Set { mode, minutes } => {
            if !durations.set(mode, minutes) {
                return Err(format!("{mode} duration must be a positive number of minutes").into());
            }
            store.save_durations(&durations)?;
            println!("{mode}: {} min", durations.minutes(mode));
        }
    }
    Ok(())
}
