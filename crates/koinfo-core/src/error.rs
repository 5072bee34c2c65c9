//! Error types for Koinfo

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Missing or malformed input (blank names, bad dates, non-finite numbers)
    #[error("{0}")]
    Validation(String),

    /// Case-insensitive name clash among active peers
    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    /// A transaction points at a category id that does not exist
    #[error("Invalid category_id: {0}")]
    InvalidCategory(String),

    /// The category is owned by a debt or goal
    #[error("Category is linked to a Debt/Goal and cannot be deleted here")]
    LinkedEntity(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    pub(crate) fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
