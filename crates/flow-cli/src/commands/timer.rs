use clap::Subcommand;
use flow_core::{Config, Event, TimerEngine, TimerMode};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground, reading commands from stdin
    ///
    /// Commands: start, pause, reset, skip, mode <focus|short|long>,
    /// duration <mode> <minutes>, tag <name>, status, quit
    Run {
        /// Mode to show first
        #[arg(long)]
        mode: Option<TimerMode>,
        /// Tag to record focus sessions under
        #[arg(long)]
        tag: Option<String>,
        /// Exit after this many finished countdowns
        #[arg(long)]
        cycles: Option<u32>,
    },
    /// Print the state of a fresh timer as JSON
    Status,
}

/// What the loop does after a stdin line.
enum Control {
    Continue,
    Quit,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut engine = open_engine(&config)?;

    match action {
        TimerAction::Run { mode, tag, cycles } => {
            if let Some(mode) = mode {
                engine.set_mode(mode);
            }
            if let Some(tag) = tag {
                engine.select_tag(&tag)?;
            }
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(drive(engine, config.tick_interval(), cycles))?;
        }
        TimerAction::Status => {
            print_json(&engine.snapshot())?;
        }
    }
    Ok(())
}

/// Event loop: interval ticks, stdin commands and Ctrl-C on one thread.
///
/// Ticks only reach the engine while it holds a subscription. After stdin
/// closes the loop keeps going for a running timer and ends otherwise.
async fn drive(
    mut engine: TimerEngine,
    tick_interval: std::time::Duration,
    cycles: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut finished = 0u32;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    emit(&engine.snapshot())?;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if engine.active_subscription().is_none() {
                    if !stdin_open {
                        break;
                    }
                    continue;
                }
                if let Some(event) = engine.tick() {
                    emit(&event)?;
                    if let Event::TimerCompleted { mode, next_mode, .. } = &event {
                        finished += 1;
                        info!(mode = %mode, next = %next_mode, count = finished, "countdown finished");
                        eprintln!("{mode} finished, {next_mode} started");
                        if cycles.is_some_and(|limit| finished >= limit) {
                            break;
                        }
                    }
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match handle_line(&mut engine, &line) {
                        Ok(Control::Continue) => {}
                        Ok(Control::Quit) => break,
                        Err(e) => eprintln!("error: {e}"),
                    },
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                        if engine.active_subscription().is_none() {
                            break;
                        }
                    }
                }
            }
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
        }
    }
    Ok(())
}

fn handle_line(
    engine: &mut TimerEngine,
    line: &str,
) -> Result<Control, Box<dyn std::error::Error>> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(Control::Continue);
    };

    let event = match command {
        "start" => engine.start(),
        "pause" => engine.pause(),
        "reset" => engine.reset(),
        "skip" => engine.skip(),
        "mode" => {
            let mode: TimerMode = required(parts.next(), "mode")?.parse()?;
            engine.set_mode(mode)
        }
        "duration" => {
            let mode: TimerMode = required(parts.next(), "mode")?.parse()?;
            let minutes: i64 = required(parts.next(), "minutes")?.parse()?;
            engine.set_duration(mode, minutes)
        }
        "tag" => {
            let name = parts.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return Err("missing <tag>".into());
            }
            Some(engine.select_tag(&name)?)
        }
        "status" => Some(engine.snapshot()),
        "quit" | "exit" => return Ok(Control::Quit),
        other => return Err(format!("unknown command '{other}'").into()),
    };

    match event {
        Some(event) => emit(&event)?,
        None => debug!(command, "command had no effect"),
    }
    Ok(Control::Continue)
}

fn required<'a>(arg: Option<&'a str>, name: &str) -> Result<&'a str, String> {
    arg.ok_or_else(|| format!("missing <{name}>"))
}

/// One JSON event per line on stdout.
fn emit(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
