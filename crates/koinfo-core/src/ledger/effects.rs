//! Balance and progress deltas caused by transactions
//!
//! Debt balances and goal progress are stored, not recomputed, so each
//! transaction change must first revert the effect it had and then apply the
//! effect it has now. Both steps clamp at zero, and a step whose result would
//! overflow to infinity is rejected.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Dataset, DebtKind, Transaction};

/// Change to a debt balance caused by a transaction of `amount`
///
/// A claim grows a receivable and shrinks a payable. A plain payment always
/// shrinks the balance, whatever the kind.
pub fn debt_effect(kind: DebtKind, amount: f64, debt_claim: bool) -> f64 {
    let a = amount.abs();
    if debt_claim {
        match kind {
            DebtKind::Receivable => a,
            DebtKind::Payable => -a,
        }
    } else {
        -a
    }
}

/// Change to goal progress caused by a transaction of `amount`
pub fn goal_effect(amount: f64, goal_withdrawal: bool) -> f64 {
    if goal_withdrawal {
        -amount
    } else {
        amount
    }
}

/// Whether an effect is being added or taken back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Apply,
    Revert,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Self::Apply => 1.0,
            Self::Revert => -1.0,
        }
    }
}

/// `value + delta`, clamped at zero; non-finite results are rejected
fn shifted(value: f64, delta: f64, field: &str) -> Result<f64> {
    let next = (value + delta).max(0.0);
    if next.is_finite() {
        Ok(next)
    } else {
        Err(Error::Validation(format!("Transaction would make {} too large", field)))
    }
}

impl Dataset {
    /// Add (or take back) the effect of `tx` on whatever debt and goal own its category
    ///
    /// Nothing is changed when either new value would not be finite.
    pub(crate) fn shift_linked(&mut self, tx: &Transaction, direction: Direction) -> Result<()> {
        let sign = direction.sign();
        let debt_index = self
            .debts
            .iter()
            .position(|d| d.linked_category_id.as_deref() == Some(tx.category_id.as_str()));
        let goal_index = self
            .goals
            .iter()
            .position(|g| g.linked_category_id.as_deref() == Some(tx.category_id.as_str()));

        let debt_balance = match debt_index {
            Some(i) => {
                let debt = &self.debts[i];
                let effect = debt_effect(debt.kind, tx.amount, tx.debt_claim);
                Some(shifted(debt.balance, sign * effect, "debt balance")?)
            }
            None => None,
        };
        let goal_current = match goal_index {
            Some(i) => {
                let effect = goal_effect(tx.amount, tx.goal_withdrawal);
                Some(shifted(self.goals[i].current, sign * effect, "goal progress")?)
            }
            None => None,
        };

        if let (Some(i), Some(balance)) = (debt_index, debt_balance) {
            let debt = &mut self.debts[i];
            debt.balance = balance;
            debug!(
                transaction = %tx.id,
                debt = %debt.id,
                ?direction,
                balance,
                "Shifted debt balance"
            );
        }

        if let (Some(i), Some(current)) = (goal_index, goal_current) {
            let goal = &mut self.goals[i];
            goal.current = current;
            debug!(
                transaction = %tx.id,
                goal = %goal.id,
                ?direction,
                current,
                "Shifted goal progress"
            );
        }

        Ok(())
    }
}
