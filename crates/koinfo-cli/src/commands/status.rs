//! Status command implementation

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use koinfo_core::{Dataset, DebtKind};

use super::open_ledger;

/// Render the status report for a dataset
pub fn format_status(data: &Dataset) -> String {
    let summary = data.summary();
    let mut out = String::new();

    out.push_str(&format!(
        "   Categories: {} active, {} archived\n",
        summary.active_categories, summary.deleted_categories
    ));
    out.push_str(&format!("   Transactions: {}\n", summary.transactions));
    out.push_str(&format!("   Opening balance: {:.2}\n", summary.open_balance));
    out.push_str(&format!("   Income:   {:>12.2}\n", summary.total_income));
    out.push_str(&format!("   Expenses: {:>12.2}\n", summary.total_expense));
    out.push_str(&format!("   Savings:  {:>12.2}\n", summary.total_saving));

    if !data.debts.is_empty() {
        out.push_str(&format!(
            "\n   💳 Debts ({} owed, {} owed to you)\n",
            format_amount(summary.total_payable),
            format_amount(summary.total_receivable)
        ));
        for debt in &data.debts {
            let direction = match debt.kind {
                DebtKind::Payable => "owe",
                DebtKind::Receivable => "owed",
            };
            out.push_str(&format!(
                "      {:<24} {:>12.2} ({})\n",
                debt.name, debt.balance, direction
            ));
        }
    }

    if !data.goals.is_empty() {
        out.push_str(&format!(
            "\n   🎯 Goals ({} of {})\n",
            format_amount(summary.goal_progress),
            format_amount(summary.goal_target)
        ));
        for goal in &data.goals {
            let pct = if goal.target > 0.0 {
                goal.current / goal.target * 100.0
            } else {
                0.0
            };
            out.push_str(&format!(
                "      {:<24} {:>10.2} / {:<10.2} {:>5.1}%  by {}\n",
                goal.name, goal.current, goal.target, pct, goal.deadline
            ));
        }
    }

    out
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn cmd_status(data_path: &Path) -> Result<()> {
    println!();
    println!("📊 Koinfo Status");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Data file: {}", data_path.display());

    if !data_path.exists() {
        println!("   (data file not initialized, run 'koinfo init')");
        println!();
        return Ok(());
    }

    let metadata = fs::metadata(data_path)
        .with_context(|| format!("Failed to read {}", data_path.display()))?;
    println!("   Size: {:.1} KB", metadata.len() as f64 / 1024.0);

    let data = open_ledger(data_path)?.data()?;
    println!();
    print!("{}", format_status(&data));
    println!();

    Ok(())
}
