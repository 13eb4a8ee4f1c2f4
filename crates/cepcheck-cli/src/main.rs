use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cepcheck_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "cepcheck")]
#[command(author, version, about = "Check whether a CEP is inside the served region")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// Look up one CEP and print the result
    Check {
        /// CEP, masked or not (01310-930 or 01310930)
        cep: String,
        /// Print the result payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the masked form of an input
    Mask {
        input: String,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Write a configuration file with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // The TUI owns the terminal, so its logs go to a file
    let log_to_file = matches!(cli.command, Some(Commands::Run) | None);
    init_logging(&config, log_to_file)?;

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Check { cep, json }) => commands::check::run(&config, &cep, json).await,
        Some(Commands::Mask { input }) => commands::mask::run(&input),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}

/// `RUST_LOG` wins over `general.log_level`
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
