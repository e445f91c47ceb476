//! Blocking HTTP client for the product catalog.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// One product as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogProduct {
    pub id: Option<u32>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    products: Vec<CatalogProduct>,
}

/// Anything that can supply catalog products.
///
/// Implementations must not fail: an unavailable source returns an empty
/// list so enrichment can still run with every record unmatched.
pub trait ProductSource {
    fn fetch_products(&self) -> Vec<CatalogProduct>;
}

/// Parse a catalog response body of the form `{"products": [...]}`.
pub fn parse_catalog_response(body: &str) -> Result<Vec<CatalogProduct>> {
    let response: CatalogResponse = serde_json::from_str(body)?;
    Ok(response.products)
}

// ── CatalogClient ─────────────────────────────────────────────────────────────

/// Fetches the product list from a remote JSON endpoint.
pub struct CatalogClient {
    url: String,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One fetch attempt, surfacing every failure.
    pub fn try_fetch(&self) -> Result<Vec<CatalogProduct>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        debug!("GET {}", self.url);
        let response = client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_catalog_response(&body)
    }
}

impl ProductSource for CatalogClient {
    fn fetch_products(&self) -> Vec<CatalogProduct> {
        match self.try_fetch() {
            Ok(products) => {
                info!("Fetched {} products from {}", products.len(), self.url);
                products
            }
            Err(e) => {
                warn!(error = %e, url = %self.url, "catalog fetch failed; continuing without products");
                Vec::new()
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
