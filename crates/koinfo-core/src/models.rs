//! Domain models for Koinfo

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fresh random identifier for a new record
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// What a category (and therefore a transaction) counts as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    #[default]
    Expense,
    Saving,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Saving => "saving",
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DebtKind {
    /// Money owed by the user
    #[default]
    Payable,
    /// Money owed to the user
    Receivable,
}

impl DebtKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payable => "payable",
            Self::Receivable => "receivable",
        }
    }

    /// Category type used for the debt's linked category
    pub fn category_type(&self) -> CategoryType {
        match self {
            Self::Payable => CategoryType::Expense,
            Self::Receivable => CategoryType::Income,
        }
    }
}

impl std::fmt::Display for DebtKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-defined or debt/goal-owned category
///
/// Categories move one way: active, then soft-deleted. A soft-deleted category
/// stays in the dataset so historical transactions still resolve its name, but
/// it no longer takes part in uniqueness checks and is never linked again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[serde(default)]
    pub deleted: bool,
}

impl Category {
    pub(crate) fn new(name: impl Into<String>, category_type: CategoryType) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            category_type,
            deleted: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// An outstanding debt, payable or receivable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    pub name: String,
    /// Outstanding amount, never negative
    pub balance: f64,
    #[serde(default)]
    pub kind: DebtKind,
    #[serde(default)]
    pub linked_category_id: Option<String>,
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target: f64,
    /// Progress accumulated from transactions, never negative
    #[serde(default)]
    pub current: f64,
    pub deadline: NaiveDate,
    pub created: NaiveDate,
    #[serde(default)]
    pub linked_category_id: Option<String>,
}

/// A recorded income, expense or saving movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub category_id: String,
    pub amount: f64,
    #[serde(default)]
    pub note: String,
    /// Copied from the category when the transaction is written
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[serde(default)]
    pub use_open_balance: bool,
    /// Records a new claim on a debt instead of a payment against it
    #[serde(default)]
    pub debt_claim: bool,
    /// Takes money out of a goal instead of depositing into it
    #[serde(default)]
    pub goal_withdrawal: bool,
}

/// The whole persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Dataset {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Money brought forward from before the app was used
    #[serde(default)]
    pub open_balance: f64,
}

impl Dataset {
    /// Starter dataset written on first run and on reset
    pub fn seeded() -> Self {
        Self {
            categories: vec![
                Category::new("Salary", CategoryType::Income),
                Category::new("Groceries", CategoryType::Expense),
                Category::new("Investments", CategoryType::Saving),
            ],
            transactions: Vec::new(),
            debts: Vec::new(),
            goals: Vec::new(),
            open_balance: 0.0,
        }
    }
}

// ============================================================================
// Requests
//
// Create requests default every absent field. Patches only touch the fields
// that are present, so an edit never resets a flag it did not mention.
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategory {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDebt {
    pub name: Option<String>,
    pub balance: Option<f64>,
    pub kind: Option<DebtKind>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DebtPatch {
    pub name: Option<String>,
    pub balance: Option<f64>,
    pub kind: Option<DebtKind>,
}

/// Goals always start at zero progress; any `current` sent by a client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGoal {
    pub name: Option<String>,
    pub target: Option<f64>,
    /// ISO date, must be after today
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target: Option<f64>,
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTransaction {
    /// ISO date, defaults to today
    pub date: Option<String>,
    pub category_id: Option<String>,
    pub amount: Option<f64>,
    pub note: Option<String>,
    pub use_open_balance: Option<bool>,
    pub debt_claim: Option<bool>,
    pub goal_withdrawal: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPatch {
    pub date: Option<String>,
    pub category_id: Option<String>,
    pub amount: Option<f64>,
    pub note: Option<String>,
    pub use_open_balance: Option<bool>,
    pub debt_claim: Option<bool>,
    pub goal_withdrawal: Option<bool>,
}

/// Outcome of deleting a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryRemoval {
    /// No transaction referenced it, so it is gone
    Removed,
    /// Transactions still reference it, so it was soft-deleted
    SoftDeleted,
}

/// Totals for the status display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub active_categories: usize,
    pub deleted_categories: usize,
    pub transactions: usize,
    pub debts: usize,
    pub goals: usize,
    pub total_income: f64,
    pub total_expense: f64,
    pub total_saving: f64,
    pub total_payable: f64,
    pub total_receivable: f64,
    pub goal_progress: f64,
    pub goal_target: f64,
    pub open_balance: f64,
}
