//! Koinfo CLI - Personal finance tracker
//!
//! Usage:
//!   koinfo init                 Create the data file
//!   koinfo serve --port 2901    Start web server
//!   koinfo status               Show totals, debts and goals
//!   koinfo reset --yes          Start over from the starter dataset

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.data),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.data, &host, port, static_dir.as_deref()).await,
        Commands::Status => commands::cmd_status(&cli.data),
        Commands::Reset { yes } => commands::cmd_reset(&cli.data, yes),
    }
}
