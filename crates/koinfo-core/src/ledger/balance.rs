//! Opening balance, reset and summary

use tracing::info;

use crate::error::{Error, Result};
use crate::models::{CategoryType, Dataset, DebtKind, Summary};

impl Dataset {
    /// Set the money carried over from before the app was used
    pub fn set_open_balance(&mut self, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(Error::Validation("Invalid open_balance value".to_string()));
        }
        self.open_balance = value;
        info!(open_balance = value, "Updated opening balance");
        Ok(value)
    }

    /// Throw everything away and start again from the seed dataset
    pub fn reset(&mut self) -> Dataset {
        *self = Dataset::seeded();
        info!("Reset dataset to defaults");
        self.clone()
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            active_categories: self.active_categories().count(),
            deleted_categories: self.categories.iter().filter(|c| c.deleted).count(),
            transactions: self.transactions.len(),
            debts: self.debts.len(),
            goals: self.goals.len(),
            open_balance: self.open_balance,
            ..Default::default()
        };

        for tx in &self.transactions {
            match tx.category_type {
                CategoryType::Income => summary.total_income += tx.amount,
                CategoryType::Expense => summary.total_expense += tx.amount,
                CategoryType::Saving => summary.total_saving += tx.amount,
            }
        }
        for debt in &self.debts {
            match debt.kind {
                DebtKind::Payable => summary.total_payable += debt.balance,
                DebtKind::Receivable => summary.total_receivable += debt.balance,
            }
        }
        for goal in &self.goals {
            summary.goal_progress += goal.current;
            summary.goal_target += goal.target;
        }

        summary
    }
}
