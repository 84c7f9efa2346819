//! # Expo Leads CLI
//!
//! Command-line entry point for the Expo Leads API.
//!
//! ## Usage
//!
//! ```bash
//! expo-leads serve      # Start the API server (runs migrations automatically)
//! expo-leads migrate    # Run database migrations
//! expo-leads validate   # Check the environment
//! expo-leads --help     # Show help
//! ```

mod commands;
mod config;
mod server;

use clap::{CommandFactory as _, Parser};
use commands::{completions::completions, migrate::migrate, validate::validate, Commands};
use config::DatabaseConfig;
use error::{AppError, Result};

/// Expo Leads - lead capture for exhibition booths
#[derive(Parser, Debug)]
#[command(name = "expo-leads")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "EXPO_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Also write logs to this file, rotated hourly
    #[arg(long, env = "EXPO_LOG_FILE")]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        completions(args.shell, &mut Cli::command(), &mut std::io::stdout());
        return Ok(());
    }

    let _log_guard = logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = ?cli.command, "Expo Leads CLI starting...");

    match cli.command {
        Commands::Serve(args) => server::serve(&database_config()?, &args).await?,
        Commands::Migrate(args) => migrate(&database_config()?, &args).await?,
        Commands::Validate => validate()?,
        Commands::Completions(_) => {},
    }

    logging::info!(target: "app", "Expo Leads CLI completed successfully");
    Ok(())
}

fn database_config() -> Result<DatabaseConfig> { DatabaseConfig::from_env().map_err(|e| AppError::config(e.to_string())) }
