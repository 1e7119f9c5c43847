//! suggestd - background service that ingests autocomplete suggestions.

mod app;
mod cli;
mod ipc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use suggest_config_and_utils::{init_logging, init_logging_for_service, Config, Paths};

/// suggestd command-line interface.
#[derive(Parser)]
#[command(name = "suggestd")]
#[command(about = "Autocomplete suggestion ingestion daemon")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for runtime files (socket, logs, config). Defaults to ~/.suggestd
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon in the foreground
    Start,
    /// Stop the daemon
    Stop,
    /// Check daemon status
    Status,
    /// Submit one suggestion to a running daemon
    Create(cli::CreateArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = Paths::resolve(cli.base_dir.as_deref())?;
    let config = Config::load(&paths)?;
    let log_level = cli.log_level.unwrap_or_else(|| config.log_level.clone());

    match cli.command {
        Some(Commands::Start) | None => {
            init_logging(&paths, &log_level, true);
            app::run_daemon(config, paths).await?;
        }
        Some(Commands::Stop) => {
            init_logging_for_service("suggestd-cli", &paths, &log_level, false);
            app::stop_daemon(&paths).await?;
        }
        Some(Commands::Status) => {
            init_logging_for_service("suggestd-cli", &paths, &log_level, false);
            app::check_status(&paths).await?;
        }
        Some(Commands::Create(args)) => {
            init_logging_for_service("suggestd-cli", &paths, &log_level, false);
            cli::create(&paths, args).await?;
        }
    }

    Ok(())
}
