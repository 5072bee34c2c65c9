//! Koinfo Core Library
//!
//! Shared functionality for the Koinfo personal finance tracker:
//! - Data model for categories, transactions, debts and goals
//! - Single-file JSON store with atomic saves
//! - Ledger-consistency engine keeping debt balances and goal progress in
//!   step with the transactions recorded against their linked categories

pub mod error;
pub mod ledger;
pub mod models;
pub mod store;

pub use error::{Error, Result};
pub use ledger::{debt_effect, goal_effect, today, Ledger, LinkOwner};
pub use models::{
    Category, CategoryPatch, CategoryRemoval, CategoryType, Dataset, Debt, DebtKind, DebtPatch,
    Goal, GoalPatch, NewCategory, NewDebt, NewGoal, NewTransaction, Summary, Transaction,
    TransactionPatch,
};
pub use store::{JsonStore, MemoryStore, Store, DEFAULT_DATA_FILE};
