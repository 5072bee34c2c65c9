//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for one resource under `/api`.

pub mod categories;
pub mod data;
pub mod debts;
pub mod goals;
pub mod transactions;

// Re-export all handlers for use in router
pub use categories::*;
pub use data::*;
pub use debts::*;
pub use goals::*;
pub use transactions::*;
