//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_ledger` - Shared utility to open the data file
//! - `cmd_init` - Create the data file
//! - `cmd_reset` - Replace everything with the starter dataset

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use koinfo_core::{JsonStore, Ledger};
use tracing::debug;

/// Open the ledger, creating the data file if it is missing
pub fn open_ledger(data_path: &Path) -> Result<Ledger> {
    debug!(path = %data_path.display(), "Opening data file");
    Ledger::new(data_path)
        .with_context(|| format!("Failed to open data file: {}", data_path.display()))
}

pub fn cmd_init(data_path: &Path) -> Result<()> {
    println!("🔧 Initializing data file at {}...", data_path.display());

    let created = JsonStore::new(data_path)
        .init()
        .context("Failed to create data file")?;

    if created {
        println!("   Seeded starter categories (Salary, Groceries, Investments)");
        println!("✅ Data file created successfully!");
    } else {
        println!("   Data file already exists, left unchanged");
    }
    println!();
    println!("Next steps:");
    println!("  1. Start web UI: koinfo serve");
    println!("  2. Check totals: koinfo status");

    Ok(())
}

pub fn cmd_reset(data_path: &Path, yes: bool) -> Result<()> {
    if !yes {
        print!("⚠️  This will DELETE all transactions, debts and goals and start fresh.\n");
        print!("   Custom categories and the opening balance will be lost.\n\n");
        print!("Are you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let ledger = open_ledger(data_path)?;
    let data = ledger.reset().context("Failed to reset data file")?;

    println!("✅ Data reset complete.");
    println!("   Categories: {}", data.categories.len());

    Ok(())
}
