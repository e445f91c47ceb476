//! Persistence of enriched records.

use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use sales_core::error::{Result, SalesError};
use sales_core::models::{EnrichedTransaction, FIELD_DELIMITER};
use tracing::info;

/// Column order of the enriched data file.
pub const ENRICHED_HEADER: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

/// Destination for enriched records.
pub trait EnrichedSink {
    fn write_records(&mut self, records: &[EnrichedTransaction]) -> Result<()>;
}

/// The columns of one record in [`ENRICHED_HEADER`] order. Absent metadata
/// becomes an empty field.
pub fn enriched_fields(record: &EnrichedTransaction) -> [String; 12] {
    let t = &record.transaction;
    [
        t.transaction_id.clone(),
        t.date.clone(),
        t.product_id.clone(),
        t.product_name.clone(),
        t.quantity.to_string(),
        t.unit_price.to_string(),
        t.customer_id.clone(),
        t.region.clone(),
        record.api_category.clone().unwrap_or_default(),
        record.api_brand.clone().unwrap_or_default(),
        record.api_rating.map(|r| r.to_string()).unwrap_or_default(),
        record.api_match.to_string(),
    ]
}

/// Write the header row and one row per record to `writer`.
///
/// Fields containing the delimiter, a quote or a line break are quoted so
/// every row keeps exactly twelve columns.
pub fn write_enriched<W: Write>(writer: W, records: &[EnrichedTransaction]) -> csv::Result<()> {
    let mut out = WriterBuilder::new()
        .delimiter(FIELD_DELIMITER as u8)
        .from_writer(writer);

    out.write_record(ENRICHED_HEADER)?;
    for record in records {
        out.write_record(enriched_fields(record))?;
    }
    out.flush()?;
    Ok(())
}

// ── PipeFileSink ──────────────────────────────────────────────────────────────

/// Writes enriched records as a UTF-8, pipe-delimited text file with a
/// header row.
pub struct PipeFileSink {
    path: PathBuf,
}

impl PipeFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, records: &[EnrichedTransaction]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::File::create(&self.path)?;
        write_enriched(std::io::BufWriter::new(file), records)?;
        Ok(())
    }
}

impl EnrichedSink for PipeFileSink {
    fn write_records(&mut self, records: &[EnrichedTransaction]) -> Result<()> {
        self.write_file(records).map_err(|source| SalesError::FileWrite {
            path: self.path.clone(),
            source,
        })?;
        info!("Saved {} enriched records to {}", records.len(), self.path.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
