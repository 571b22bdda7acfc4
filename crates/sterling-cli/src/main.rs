//! Sterling CLI - Conversational financial planning engine
//!
//! Usage:
//!   sterling extract --file transcript.json    Extract financial facts
//!   sterling plan --goal retirement --file transcript.json
//!   sterling health --file transcript.json     Score financial health

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Extract { file, json } => commands::cmd_extract(&file, json),
        Commands::Plan { file, goal, json } => {
            commands::cmd_plan(&file, &goal, cli.tax_config.as_deref(), json)
        }
        Commands::Health { file, json } => {
            commands::cmd_health(&file, cli.tax_config.as_deref(), json)
        }
    }
}
