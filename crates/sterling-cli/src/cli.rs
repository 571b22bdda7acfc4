//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sterling - Conversational financial planning engine
#[derive(Parser)]
#[command(name = "sterling")]
#[command(about = "Turn a conversation transcript into a UK financial plan", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Tax-year config file (defaults to the embedded 2025/26 constants)
    #[arg(long, global = true)]
    pub tax_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract financial facts from a conversation transcript
    Extract {
        /// Transcript JSON file (array of {role, text, timestamp}); "-" for stdin
        #[arg(short, long)]
        file: PathBuf,

        /// Print raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Generate a financial plan from a transcript
    Plan {
        /// Transcript JSON file; "-" for stdin
        #[arg(short, long)]
        file: PathBuf,

        /// Goal type: retirement, house_purchase, investment, protection, comprehensive
        #[arg(short, long, default_value = "comprehensive")]
        goal: String,

        /// Print raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Score financial health from a transcript
    Health {
        /// Transcript JSON file; "-" for stdin
        #[arg(short, long)]
        file: PathBuf,

        /// Print raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}
