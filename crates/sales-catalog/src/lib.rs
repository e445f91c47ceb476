//! Remote product catalog integration.
//!
//! Fetches product metadata over HTTP, maps it by numeric product id,
//! annotates transactions with it and persists the enriched records.

pub mod client;
pub mod enrich;
pub mod error;
pub mod sink;
