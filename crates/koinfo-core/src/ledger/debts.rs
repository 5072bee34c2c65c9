//! Debt registry

use tracing::info;

use super::fold_name;
use crate::error::{Error, Result};
use crate::models::{new_id, Dataset, Debt, DebtPatch, NewDebt};

const DEFAULT_DEBT_NAME: &str = "Unnamed Debt";

fn clamp_balance(balance: f64) -> Result<f64> {
    if !balance.is_finite() {
        return Err(Error::Validation("Invalid balance".to_string()));
    }
    Ok(balance.max(0.0))
}

impl Dataset {
    pub fn debt(&self, id: &str) -> Option<&Debt> {
        self.debts.iter().find(|d| d.id == id)
    }

    fn debt_name_taken(&self, name: &str, exclude_id: Option<&str>) -> bool {
        let folded = fold_name(name);
        self.debts
            .iter()
            .filter(|d| Some(d.id.as_str()) != exclude_id)
            .any(|d| fold_name(&d.name) == folded)
    }

    /// Create a debt together with its linked category
    pub fn create_debt(&mut self, req: NewDebt) -> Result<Debt> {
        let name = match req.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_DEBT_NAME.to_string(),
        };
        if self.debt_name_taken(&name, None) {
            return Err(Error::duplicate("Debt", name));
        }

        let mut debt = Debt {
            id: new_id(),
            name,
            balance: clamp_balance(req.balance.unwrap_or(0.0))?,
            kind: req.kind.unwrap_or_default(),
            linked_category_id: None,
        };
        self.ensure_linked_category(&mut debt);
        self.debts.push(debt.clone());

        info!(id = %debt.id, name = %debt.name, kind = %debt.kind, balance = debt.balance, "Created debt");
        Ok(debt)
    }

    /// Update a debt and resync its linked category
    pub fn update_debt(&mut self, id: &str, patch: DebtPatch) -> Result<Debt> {
        let index = self
            .debts
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| Error::NotFound(format!("debt {}", id)))?;
        let mut debt = self.debts[index].clone();

        if let Some(raw) = patch.name.as_deref() {
            let name = raw.trim();
            if name.is_empty() {
                return Err(Error::Validation("Debt name required".to_string()));
            }
            if fold_name(name) != fold_name(&debt.name) && self.debt_name_taken(name, Some(id)) {
                return Err(Error::duplicate("Debt", name));
            }
            debt.name = name.to_string();
        }
        if let Some(balance) = patch.balance {
            debt.balance = clamp_balance(balance)?;
        }
        if let Some(kind) = patch.kind {
            debt.kind = kind;
        }

        self.ensure_linked_category(&mut debt);
        self.debts[index] = debt.clone();

        info!(id = %debt.id, name = %debt.name, kind = %debt.kind, balance = debt.balance, "Updated debt");
        Ok(debt)
    }

    /// Delete a debt and soft-delete its linked category
    pub fn delete_debt(&mut self, id: &str) -> Result<Debt> {
        let index = self
            .debts
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| Error::NotFound(format!("debt {}", id)))?;

        let debt = self.debts.remove(index);
        self.retire_linked_category(debt.linked_category_id.as_deref());

        info!(id = %debt.id, name = %debt.name, "Deleted debt");
        Ok(debt)
    }
}
