//! Product-id normalization and transaction enrichment.

use std::collections::HashMap;

use sales_core::models::{EnrichedTransaction, ProductInfo, Transaction};

use crate::client::CatalogProduct;

/// Number of products the default catalog endpoint serves (`limit=100`).
pub const DEFAULT_CATALOG_SIZE: u32 = 100;

/// Index catalog products by id. Products without an id are skipped; a
/// repeated id keeps the last entry.
pub fn create_product_mapping(products: &[CatalogProduct]) -> HashMap<u32, ProductInfo> {
    products
        .iter()
        .filter_map(|p| {
            let id = p.id?;
            Some((
                id,
                ProductInfo {
                    title: p.title.clone(),
                    category: p.category.clone(),
                    brand: p.brand.clone(),
                    rating: p.rating,
                },
            ))
        })
        .collect()
}

/// Numeric part of a product id: `"P101"` → `101`, `"P007"` → `7`.
pub fn numeric_product_id(product_id: &str) -> Option<u32> {
    product_id.trim_start_matches('P').trim().parse().ok()
}

/// Rewrite product ids so they fall inside `1..=catalog_size`.
///
/// Ids above the catalog size wrap around (`P205` → `P5`, `P200` → `P100`),
/// leading zeros are dropped, and ids with no numeric part become `P1`.
pub fn align_product_ids(transactions: &[Transaction], catalog_size: u32) -> Vec<Transaction> {
    if catalog_size == 0 {
        return transactions.to_vec();
    }

    transactions
        .iter()
        .map(|t| {
            let aligned = match numeric_product_id(&t.product_id) {
                Some(n) if n > catalog_size => match n % catalog_size {
                    0 => catalog_size,
                    r => r,
                },
                Some(n) => n,
                None => 1,
            };
            Transaction {
                product_id: format!("P{}", aligned),
                ..t.clone()
            }
        })
        .collect()
}

/// Annotate each transaction with catalog metadata.
///
/// Lookup uses [`numeric_product_id`]; an unparsable or unknown id leaves the
/// record unmatched with empty metadata.
pub fn enrich_sales_data(
    transactions: &[Transaction],
    mapping: &HashMap<u32, ProductInfo>,
) -> Vec<EnrichedTransaction> {
    transactions
        .iter()
        .map(|t| {
            match numeric_product_id(&t.product_id).and_then(|id| mapping.get(&id)) {
                Some(info) => EnrichedTransaction::matched(t.clone(), info),
                None => EnrichedTransaction::unmatched(t.clone()),
            }
        })
        .collect()
}

// ── EnrichmentSummary ─────────────────────────────────────────────────────────

/// How many records found a catalog match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentSummary {
    pub matched: usize,
    pub total: usize,
    /// Product names of unmatched records, in record order.
    pub unmatched_products: Vec<String>,
}

impl EnrichmentSummary {
    pub fn from_records(records: &[EnrichedTransaction]) -> Self {
        let unmatched_products: Vec<String> = records
            .iter()
            .filter(|r| !r.api_match)
            .map(|r| r.transaction.product_name.clone())
            .collect();

        Self {
            matched: records.len() - unmatched_products.len(),
            total: records.len(),
            unmatched_products,
        }
    }

    /// Matched share in percent, `0.0` for no records.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64 * 100.0
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
