//! Transaction create/update/delete

use chrono::NaiveDate;
use tracing::info;

use super::effects::Direction;
use super::parse_date;
use crate::error::{Error, Result};
use crate::models::{new_id, CategoryType, Dataset, NewTransaction, Transaction, TransactionPatch};

fn check_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(Error::Validation("Invalid amount".to_string()))
    }
}

impl Dataset {
    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Type to stamp on a transaction written against `category_id`
    ///
    /// Soft-deleted categories still resolve so edits to historical
    /// transactions keep working.
    fn stamp_type(&self, category_id: &str) -> Result<CategoryType> {
        self.category(category_id)
            .map(|c| c.category_type)
            .ok_or_else(|| Error::InvalidCategory(category_id.to_string()))
    }

    /// Record a transaction and apply its effect to the linked debt or goal
    pub fn create_transaction(
        &mut self,
        req: NewTransaction,
        today: NaiveDate,
    ) -> Result<Transaction> {
        let category_id = req.category_id.unwrap_or_default();
        let category_type = self.stamp_type(&category_id)?;
        let date = match req.date.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_date("transaction", raw)?,
            _ => today,
        };

        let tx = Transaction {
            id: new_id(),
            date,
            category_id,
            amount: check_amount(req.amount.unwrap_or(0.0))?,
            note: req.note.unwrap_or_default(),
            category_type,
            use_open_balance: req.use_open_balance.unwrap_or(false),
            debt_claim: req.debt_claim.unwrap_or(false),
            goal_withdrawal: req.goal_withdrawal.unwrap_or(false),
        };

        self.shift_linked(&tx, Direction::Apply)?;
        self.transactions.push(tx.clone());

        info!(id = %tx.id, category = %tx.category_id, amount = tx.amount, "Created transaction");
        Ok(tx)
    }

    /// Edit a transaction
    ///
    /// Fields absent from `patch` keep their previous values. The old effect is
    /// taken back from whoever owns the old category, then the new effect is
    /// applied to whoever owns the new one.
    pub fn update_transaction(&mut self, id: &str, patch: TransactionPatch) -> Result<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))?;
        let old = self.transactions[index].clone();

        let category_id = patch.category_id.unwrap_or_else(|| old.category_id.clone());
        let category_type = self.stamp_type(&category_id)?;
        let date = match patch.date.as_deref() {
            Some(raw) => parse_date("transaction", raw)?,
            None => old.date,
        };
        let amount = match patch.amount {
            Some(amount) => check_amount(amount)?,
            None => old.amount,
        };

        let updated = Transaction {
            id: old.id.clone(),
            date,
            category_id,
            amount,
            note: patch.note.unwrap_or_else(|| old.note.clone()),
            category_type,
            use_open_balance: patch.use_open_balance.unwrap_or(old.use_open_balance),
            debt_claim: patch.debt_claim.unwrap_or(old.debt_claim),
            goal_withdrawal: patch.goal_withdrawal.unwrap_or(old.goal_withdrawal),
        };

        let (debts, goals) = (self.debts.clone(), self.goals.clone());
        if let Err(err) = self
            .shift_linked(&old, Direction::Revert)
            .and_then(|_| self.shift_linked(&updated, Direction::Apply))
        {
            self.debts = debts;
            self.goals = goals;
            return Err(err);
        }
        self.transactions[index] = updated.clone();

        info!(
            id = %updated.id,
            category = %updated.category_id,
            amount = updated.amount,
            "Updated transaction"
        );
        Ok(updated)
    }

    /// Remove a transaction and take back its effect
    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))?;

        let tx = self.transactions[index].clone();
        self.shift_linked(&tx, Direction::Revert)?;
        self.transactions.remove(index);

        info!(id = %tx.id, category = %tx.category_id, amount = tx.amount, "Deleted transaction");
        Ok(tx)
    }
}
