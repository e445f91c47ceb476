//! Shared domain types for the sales analytics pipeline.
//!
//! Holds the transaction model, the error taxonomy, number and currency
//! formatting helpers and the command-line settings used by every other
//! crate in the workspace.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
