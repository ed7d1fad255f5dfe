use clap::{Parser, Subcommand};
use mindgarden_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mindgarden", version, about = "Mind Garden habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management and daily logging
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Streaks, completion rates and the dashboard
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

/// Log to stderr so JSON on stdout stays machine-readable.
/// `MINDGARDEN_LOG` takes precedence over the configured level.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("MINDGARDEN_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    let loaded = Config::load();
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    init_tracing(&level);
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default configuration");
        Config::default()
    });

    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Stats { action } => commands::stats::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
