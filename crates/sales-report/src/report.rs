//! Renders the sales analytics report.
//!
//! Lays a precomputed [`SalesAnalysis`] and [`EnrichmentSummary`] out as
//! fixed-width text sections.

use std::path::Path;

use chrono::Local;
use sales_catalog::enrich::EnrichmentSummary;
use sales_core::error::{Result, SalesError};
use sales_core::formatting::{format_currency, DEFAULT_CURRENCY_SYMBOL};
use sales_data::aggregator::{SalesAnalysis, DEFAULT_TOP_N};
use tracing::info;

const RULE_WIDTH: usize = 70;

/// Number of customers listed in the report.
pub const TOP_CUSTOMERS: usize = 5;

/// Knobs for [`render_report`].
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Product count shown in the products heading.
    pub top_n: usize,
    pub currency_symbol: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Build the full report text.
///
/// `generated_at` is printed verbatim in the header so callers control the
/// clock.
pub fn render_report(
    analysis: &SalesAnalysis,
    enrichment: &EnrichmentSummary,
    options: &ReportOptions,
    generated_at: &str,
) -> String {
    let money = |amount: f64, decimals: u32| format_currency(amount, &options.currency_symbol, decimals);

    let mut lines: Vec<String> = Vec::new();

    // Header
    lines.push("=".repeat(RULE_WIDTH));
    lines.push("                     SALES ANALYTICS REPORT".to_string());
    lines.push(format!("                 Generated: {}", generated_at));
    lines.push(format!("                 Records Processed: {}", analysis.transaction_count));
    lines.push("=".repeat(RULE_WIDTH));
    lines.push(String::new());

    // Overall summary
    section(&mut lines, "OVERALL SUMMARY");
    let date_range = analysis
        .date_range()
        .map(|(first, last)| format!("{} to {}", first, last))
        .unwrap_or_else(|| "N/A".to_string());
    lines.push(format!("{:<25} {}", "Total Revenue:", money(analysis.total_revenue, 2)));
    lines.push(format!("{:<25} {}", "Total Transactions:", analysis.transaction_count));
    lines.push(format!(
        "{:<25} {}",
        "Average Order Value:",
        money(analysis.average_order_value(), 2)
    ));
    lines.push(format!("{:<25} {}", "Date Range:", date_range));
    lines.push(String::new());

    // Regions
    section(&mut lines, "REGION-WISE PERFORMANCE");
    lines.push(format!(
        "{:<12}{:<18}{:>12}{:>15}",
        "Region", "Sales", "% of Total", "Transactions"
    ));
    for r in &analysis.regions {
        lines.push(format!(
            "{:<12}{:<18}{:>11.2}%{:>15}",
            r.region,
            money(r.total_sales, 2),
            r.percentage,
            r.transaction_count
        ));
    }
    lines.push(String::new());

    // Products
    section(&mut lines, &format!("TOP {} PRODUCTS", options.top_n));
    lines.push(format!(
        "{:<6}{:<20}{:<12}{:<15}",
        "Rank", "Product Name", "Quantity", "Revenue"
    ));
    for (rank, p) in analysis.top_products.iter().enumerate() {
        lines.push(format!(
            "{:<6}{:<20}{:<12}{:<15}",
            rank + 1,
            p.name,
            p.quantity,
            money(p.revenue, 0)
        ));
    }
    lines.push(String::new());

    // Customers
    section(&mut lines, &format!("TOP {} CUSTOMERS", TOP_CUSTOMERS));
    lines.push(format!(
        "{:<6}{:<15}{:<18}{:<10}",
        "Rank", "Customer ID", "Total Spent", "Orders"
    ));
    for (rank, c) in analysis.customers.iter().take(TOP_CUSTOMERS).enumerate() {
        lines.push(format!(
            "{:<6}{:<15}{:<18}{:<10}",
            rank + 1,
            c.customer_id,
            money(c.total_spent, 0),
            c.purchase_count
        ));
    }
    lines.push(String::new());

    // Daily trend
    section(&mut lines, "DAILY SALES TREND");
    lines.push(format!(
        "{:<12}{:<15}{:<15}{:<18}",
        "Date", "Revenue", "Transactions", "Unique Customers"
    ));
    for d in &analysis.daily_trend {
        lines.push(format!(
            "{:<12}{:<15}{:<15}{:<18}",
            d.date,
            money(d.revenue, 0),
            d.transaction_count,
            d.unique_customers
        ));
    }
    lines.push(String::new());

    // Product performance
    section(&mut lines, "PRODUCT PERFORMANCE ANALYSIS");
    if let Some(peak) = &analysis.peak_day {
        lines.push(format!(
            "Best Selling Day: {} (Revenue {}, Transactions {})",
            peak.date,
            money(peak.revenue, 0),
            peak.transaction_count
        ));
    }
    if !analysis.low_performers.is_empty() {
        lines.push("Low Performing Products:".to_string());
        lines.push(format!("{:<20}{:<12}{:<15}", "Product", "Quantity", "Revenue"));
        for p in &analysis.low_performers {
            lines.push(format!(
                "{:<20}{:<12}{:<15}",
                p.name,
                p.quantity,
                money(p.revenue, 0)
            ));
        }
    }
    lines.push(String::new());

    // Enrichment
    section(&mut lines, "API ENRICHMENT SUMMARY");
    lines.push(format!(
        "{:<30}{}/{}",
        "Total Products Enriched:", enrichment.matched, enrichment.total
    ));
    lines.push(format!("{:<30}{:.1}%", "Success Rate:", enrichment.success_rate()));
    if !enrichment.unmatched_products.is_empty() {
        lines.push("Products not enriched:".to_string());
        for name in &enrichment.unmatched_products {
            lines.push(format!("  - {}", name));
        }
    }
    lines.push(String::new());

    lines.join("\n")
}

/// Write `content` to `path`, creating parent directories.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    let to_write_error = |source| SalesError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(to_write_error)?;
    }
    std::fs::write(path, content).map_err(to_write_error)?;

    info!("Report written to {}", path.display());
    Ok(())
}

/// Local wall-clock time in the report header format.
pub fn generated_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push("-".repeat(RULE_WIDTH));
}

// ── Tests ─────────────────────────────────────────────────────────────────────
