//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_ledger) plus init and reset
//! - `serve` - Web server command
//! - `status` - Dataset summary

pub mod core;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use serve::*;
pub use status::*;
