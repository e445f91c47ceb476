//! Data ingestion and analysis layer for the sales pipeline.
//!
//! Responsible for recovering raw lines from a transaction log of unknown
//! encoding, parsing them into typed records, validating and filtering those
//! records, and computing the aggregate statistics used by the report.

pub mod aggregator;
pub mod grouping;
pub mod parser;
pub mod reader;
pub mod validator;

pub use sales_core as core;
