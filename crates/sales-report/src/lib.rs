//! Fixed-width text report for the sales pipeline.

pub mod report;
