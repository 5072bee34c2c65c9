//! Ledger-consistency engine
//!
//! The rules live on [`Dataset`] and are pure over an in-memory value. They are
//! organized by domain:
//! - `categories` - category registry (uniqueness, soft deletion)
//! - `linked` - categories owned by debts and goals
//! - `effects` - balance/progress deltas caused by transactions
//! - `transactions` - transaction create/update/delete
//! - `debts` - debt registry
//! - `goals` - goal registry
//! - `balance` - opening balance, reset and summary
//!
//! [`Ledger`] wraps a [`Store`] and runs every change as one serialized
//! load → mutate → save cycle.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Dataset;
use crate::store::{JsonStore, MemoryStore, Store};

mod balance;
mod categories;
mod debts;
mod effects;
mod goals;
mod linked;
mod transactions;

pub use effects::{debt_effect, goal_effect, Direction};
pub use linked::LinkOwner;

/// Case-folded, trimmed form used for every name comparison
pub(crate) fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse an ISO `YYYY-MM-DD` date supplied by a client
pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("Invalid {} date", field)))
}

/// Today's date on the local clock
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Store plus the lock that serializes load-mutate-save cycles
pub struct Ledger {
    store: Box<dyn Store>,
    lock: Mutex<()>,
}

impl Ledger {
    /// Open a ledger backed by the JSON file at `path`
    ///
    /// The file is created with the seed dataset if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let store = JsonStore::new(path);
        store.init()?;
        Ok(Self::with_store(Box::new(store)))
    }

    /// Create a ledger over any store
    pub fn with_store(store: Box<dyn Store>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Create an in-memory ledger (for testing)
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    /// Where the data lives, for logs
    pub fn location(&self) -> String {
        self.store.describe()
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| Error::Storage("ledger lock poisoned".to_string()))
    }

    /// Current dataset
    pub fn data(&self) -> Result<Dataset> {
        let _guard = self.guard()?;
        self.store.load()
    }

    /// Apply `f` to a freshly loaded dataset and save it if `f` succeeds
    ///
    /// Nothing is written when `f` returns an error, so a rejected request
    /// never leaves a partial change behind.
    pub fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Dataset) -> Result<T>,
    {
        let _guard = self.guard()?;
        let mut data = self.store.load()?;
        let out = f(&mut data)?;
        self.store.save(&data)?;
        debug!(store = %self.store.describe(), "Committed change");
        Ok(out)
    }

    /// Replace everything with a fresh seed dataset
    pub fn reset(&self) -> Result<Dataset> {
        self.write(|data| Ok(data.reset()))
    }
}
