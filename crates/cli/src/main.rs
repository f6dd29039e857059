//! Skyline CLI — the main entry point.
//!
//! Commands:
//! - `chat`     — Interactive support session, or one question with `--message`
//! - `context`  — Print the formatted knowledge base
//! - `doctor`   — Check configuration, API key and knowledge base
//! - `onboard`  — Write a default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use skyline_config::{AppConfig, ConfigError, LoggingConfig};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "skyline",
    about = "Skyline Residences — AI Customer Support",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config.toml (defaults to ~/.skyline/config.toml)
    #[arg(short, long, global = true, env = "SKYLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the support assistant (default)
    Chat {
        /// Ask a single question instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Print the knowledge base exactly as the model sees it
    Context,

    /// Diagnose configuration and knowledge base
    Doctor,

    /// Write a default configuration file
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);

    let loaded = AppConfig::load_with_env(&config_path);
    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging, cli.verbose || matches!(&loaded, Ok(c) if c.session.verbose))?;

    match cli.command.unwrap_or(Commands::Chat { message: None }) {
        Commands::Chat { message } => commands::chat::run(require(loaded), message).await?,
        Commands::Context => commands::context::run(&require(loaded))?,
        Commands::Doctor => commands::doctor::run(&config_path, loaded).await?,
        Commands::Onboard => commands::onboard::run(&config_path)?,
    }

    Ok(())
}

fn require(loaded: Result<AppConfig, ConfigError>) -> AppConfig {
    match loaded {
        Ok(config) => config,
        Err(e) => commands::fatal(&format!("Configuration error: {e}")),
    }
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) -> std::io::Result<()> {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match logging.log_file() {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
