use serde::{Deserialize, Serialize};

/// Field name that opens the header row of a transaction log.
pub const HEADER_MARKER: &str = "TransactionID";

/// Column separator used by transaction logs and the enriched output file.
pub const FIELD_DELIMITER: char = '|';

/// Number of columns in a well-formed transaction line.
pub const FIELD_COUNT: usize = 8;

/// A single sale read from the transaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier, expected to start with `T`.
    pub transaction_id: String,
    /// Sale date as an ISO `YYYY-MM-DD` string. Not calendar-checked.
    pub date: String,
    /// Product identifier, expected to start with `P`.
    pub product_id: String,
    /// Human-readable product name with commas removed.
    pub product_name: String,
    /// Units sold.
    pub quantity: i64,
    /// Price per unit.
    pub unit_price: f64,
    /// Customer identifier, expected to start with `C`.
    pub customer_id: String,
    /// Sales region.
    pub region: String,
}

impl Transaction {
    /// `quantity × unit_price`.
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Product metadata looked up from the remote catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub title: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
}

/// A transaction annotated with catalog metadata.
///
/// The wrapped [`Transaction`] is never modified by enrichment; the `api_*`
/// fields are `None` and `api_match` is `false` when no catalog entry matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub api_category: Option<String>,
    pub api_brand: Option<String>,
    pub api_rating: Option<f64>,
    pub api_match: bool,
}

impl EnrichedTransaction {
    /// Wrap `transaction` with no catalog match.
    pub fn unmatched(transaction: Transaction) -> Self {
        Self {
            transaction,
            api_category: None,
            api_brand: None,
            api_rating: None,
            api_match: false,
        }
    }

    /// Wrap `transaction` with the metadata from `info`.
    pub fn matched(transaction: Transaction, info: &ProductInfo) -> Self {
        Self {
            transaction,
            api_category: info.category.clone(),
            api_brand: info.brand.clone(),
            api_rating: info.rating,
            api_match: true,
        }
    }
}

/// Optional filters applied after validation.
///
/// Every field left as `None` disables the corresponding filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl FilterOptions {
    /// `true` when no filter is active.
    pub fn is_empty(&self) -> bool {
        self.active_region().is_none() && self.min_amount.is_none() && self.max_amount.is_none()
    }

    /// The region filter, treating an empty string as absent.
    pub fn active_region(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.is_empty())
    }
}

/// Counts describing how many records each stage removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSummary {
    /// Records handed to validation.
    pub total_input: usize,
    /// Records rejected by validation.
    pub invalid: usize,
    /// Valid records removed by the region filter.
    pub filtered_by_region: usize,
    /// Records removed by the min and max amount filters combined.
    pub filtered_by_amount: usize,
    /// Records surviving every stage.
    pub final_count: usize,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
