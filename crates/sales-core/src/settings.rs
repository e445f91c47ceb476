use clap::Parser;
use std::path::{Path, PathBuf};

use crate::error::{Result, SalesError};
use crate::formatting::DEFAULT_CURRENCY_SYMBOL;
use crate::models::FilterOptions;

/// Default endpoint of the remote product catalog.
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products?limit=100";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Clean, analyze and enrich a pipe-delimited sales transaction log
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-analytics",
    about = "Clean, analyze and enrich a pipe-delimited sales transaction log",
    version
)]
pub struct Settings {
    /// Transaction log to read
    #[arg(long, default_value = "data/sales_data.txt")]
    pub input: PathBuf,

    /// Destination of the enriched, pipe-delimited data file
    #[arg(long, default_value = "data/enriched_sales_data.txt")]
    pub enriched_output: PathBuf,

    /// Destination of the text report
    #[arg(long, default_value = "output/sales_report.txt")]
    pub report_output: PathBuf,

    /// Keep only transactions from this region
    #[arg(long)]
    pub region: Option<String>,

    /// Keep only transactions whose amount is at least this value
    #[arg(long)]
    pub min_amount: Option<f64>,

    /// Keep only transactions whose amount is at most this value
    #[arg(long)]
    pub max_amount: Option<f64>,

    /// Ask for filters on the terminal instead of taking them from flags
    #[arg(long)]
    pub interactive: bool,

    /// Number of products listed as top sellers
    #[arg(long, default_value = "5")]
    pub top_n: usize,

    /// Products with total quantity below this value are low performers
    #[arg(long, default_value = "10")]
    pub low_threshold: i64,

    /// Product catalog endpoint
    #[arg(long, env = "SALES_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Catalog request timeout in seconds (1-120)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..=120))]
    pub catalog_timeout_secs: u64,

    /// Skip the catalog fetch; every record is reported as unmatched
    #[arg(long)]
    pub offline: bool,

    /// Fold product IDs above the catalog size into the catalog's ID range
    #[arg(long)]
    pub align_ids: bool,

    /// Currency symbol prefixed to amounts in the report
    #[arg(long, default_value = DEFAULT_CURRENCY_SYMBOL)]
    pub currency_symbol: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, default_value = "output/app.log")]
    pub log_file: PathBuf,

    /// Log to stderr only
    #[arg(long, conflicts_with = "log_file")]
    pub no_log_file: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but over an explicit argument list.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Reject filter bounds that can never match anything.
    pub fn validate(&self) -> Result<()> {
        for (name, bound) in [("min", self.min_amount), ("max", self.max_amount)] {
            if let Some(v) = bound {
                if !v.is_finite() || v < 0.0 {
                    return Err(SalesError::Config(format!(
                        "--{}-amount must be a non-negative number, got {}",
                        name, v
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(SalesError::Config(format!(
                    "--min-amount ({}) exceeds --max-amount ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// Where file logging goes, or `None` when `--no-log-file` is set.
    pub fn log_path(&self) -> Option<&Path> {
        (!self.no_log_file).then_some(self.log_file.as_path())
    }

    /// The filters requested on the command line.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            region: self.region.clone().filter(|r| !r.trim().is_empty()),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
