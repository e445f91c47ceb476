//! Business-rule validation and optional region / amount filtering.

use std::collections::BTreeSet;

use sales_core::models::{FilterOptions, FilterSummary, Transaction};

// ── Rejection ─────────────────────────────────────────────────────────────────

/// The first business rule a transaction breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NonPositiveQuantity,
    NonPositivePrice,
    BadTransactionId,
    BadProductId,
    BadCustomerId,
    EmptyRegion,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Rejection::NonPositiveQuantity => "quantity must be positive",
            Rejection::NonPositivePrice => "unit price must be positive",
            Rejection::BadTransactionId => "transaction id must start with 'T'",
            Rejection::BadProductId => "product id must start with 'P'",
            Rejection::BadCustomerId => "customer id must start with 'C'",
            Rejection::EmptyRegion => "region is empty",
        };
        f.write_str(msg)
    }
}

/// Check `t` against every business rule.
pub fn validate_transaction(t: &Transaction) -> Result<(), Rejection> {
    if t.quantity <= 0 {
        Err(Rejection::NonPositiveQuantity)
    } else if t.unit_price.is_nan() || t.unit_price <= 0.0 {
        Err(Rejection::NonPositivePrice)
    } else if !t.transaction_id.starts_with('T') {
        Err(Rejection::BadTransactionId)
    } else if !t.product_id.starts_with('P') {
        Err(Rejection::BadProductId)
    } else if !t.customer_id.starts_with('C') {
        Err(Rejection::BadCustomerId)
    } else if t.region.is_empty() {
        Err(Rejection::EmptyRegion)
    } else {
        Ok(())
    }
}

// ── validate_and_filter ───────────────────────────────────────────────────────

/// Drop invalid records, then apply the region, min-amount and max-amount
/// filters in that order.
///
/// Returns `(surviving, invalid_count, summary)`. Each filter runs on the
/// output of the previous one so the summary counters add up:
/// `total_input = invalid + filtered_by_region + filtered_by_amount + final_count`.
pub fn validate_and_filter(
    transactions: &[Transaction],
    options: &FilterOptions,
) -> (Vec<Transaction>, usize, FilterSummary) {
    let mut valid: Vec<Transaction> = transactions
        .iter()
        .filter(|t| validate_transaction(t).is_ok())
        .cloned()
        .collect();
    let invalid_count = transactions.len() - valid.len();

    let mut filtered_by_region = 0;
    if let Some(region) = options.active_region() {
        filtered_by_region = retain_counting(&mut valid, |t| t.region == region);
    }

    let mut filtered_by_amount = 0;
    if let Some(min) = options.min_amount {
        filtered_by_amount += retain_counting(&mut valid, |t| t.amount() >= min);
    }
    if let Some(max) = options.max_amount {
        filtered_by_amount += retain_counting(&mut valid, |t| t.amount() <= max);
    }

    let summary = FilterSummary {
        total_input: transactions.len(),
        invalid: invalid_count,
        filtered_by_region,
        filtered_by_amount,
        final_count: valid.len(),
    };

    (valid, invalid_count, summary)
}

/// Keep the elements matching `keep`, returning how many were removed.
fn retain_counting<F>(items: &mut Vec<Transaction>, keep: F) -> usize
where
    F: Fn(&Transaction) -> bool,
{
    let before = items.len();
    items.retain(|t| keep(t));
    before - items.len()
}

// ── FilterHints ───────────────────────────────────────────────────────────────

/// What the user can filter on: the distinct regions and the amount range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterHints {
    /// Distinct regions, sorted.
    pub regions: Vec<String>,
    /// Smallest and largest amount, `None` for an empty input.
    pub amount_range: Option<(f64, f64)>,
}

/// Summarise the filterable values in `transactions`.
pub fn filter_hints(transactions: &[Transaction]) -> FilterHints {
    let regions: BTreeSet<&str> = transactions.iter().map(|t| t.region.as_str()).collect();

    let amount_range = transactions.iter().map(Transaction::amount).fold(None, |acc, a| {
        Some(match acc {
            None => (a, a),
            Some((lo, hi)) => (f64::min(lo, a), f64::max(hi, a)),
        })
    });

    FilterHints {
        regions: regions.into_iter().map(str::to_string).collect(),
        amount_range,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
