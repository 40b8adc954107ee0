use clap::{Parser, Subcommand};
use flow_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "flow-cli", version, about = "Flow focus timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Focus, short break and long break lengths
    Durations {
        #[command(subcommand)]
        action: commands::durations::DurationsAction,
    },
    /// Session tags
    Tags {
        #[command(subcommand)]
        action: commands::tags::TagsAction,
    },
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr so stdout stays machine-readable. `FLOW_LOG` wins over the
/// configured `log.filter`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("FLOW_LOG").unwrap_or_else(|_| {
        let configured = Config::load_or_default().log.filter;
        EnvFilter::try_new(&configured).unwrap_or_else(|_| EnvFilter::new("warn"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Durations { action } => commands::durations::run(action),
        Commands::Tags { action } => commands::tags::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
