use thiserror::Error;

/// Failures talking to the product catalog.
///
/// These never escape [`crate::client::CatalogClient::fetch_products`]; they
/// are logged there and the fetch degrades to an empty product list.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog responded with status {0}")]
    Status(u16),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_status() {
        assert_eq!(
            CatalogError::Status(503).to_string(),
            "Catalog responded with status 503"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: CatalogError = json_err.into();
        assert!(err.to_string().starts_with("JSON deserialization failed"));
    }
}
