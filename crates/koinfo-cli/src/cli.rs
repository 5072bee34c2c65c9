//! CLI argument definitions using clap
//!
//! This module contains the clap structs for parsing CLI arguments.
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use koinfo_core::DEFAULT_DATA_FILE;

/// Koinfo - Track income, expenses, debts and savings goals
#[derive(Parser)]
#[command(name = "koinfo")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the JSON data file
    #[arg(long, default_value = DEFAULT_DATA_FILE, global = true)]
    pub data: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data file with starter categories
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "2901")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show a summary of the data file
    Status,

    /// Replace all data with the starter dataset
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
