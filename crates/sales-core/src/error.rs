use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales pipeline.
#[derive(Error, Debug)]
pub enum SalesError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A filter value entered by the user could not be understood.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the sales crates.
pub type Result<T> = std::result::Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SalesError::FileRead {
            path: PathBuf::from("data/sales_data.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("data/sales_data.txt"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = SalesError::FileWrite {
            path: PathBuf::from("output/sales_report.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to write file output/sales_report.txt"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn test_error_display_invalid_filter() {
        let err = SalesError::InvalidFilter("minimum amount 'abc' is not a number".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid filter: minimum amount 'abc' is not a number"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = SalesError::Config("min amount exceeds max amount".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: min amount exceeds max amount"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SalesError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
