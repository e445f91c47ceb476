//! Descriptive statistics over a validated transaction set.
//!
//! All functions are pure: they borrow the transactions and return fresh
//! result structures. Grouped results break ties by first appearance in the
//! input because [`group_by`] yields groups in first-seen order and every
//! sort here is stable.

use std::collections::{BTreeSet, HashSet};

use sales_core::formatting::{percentage, round_to};
use sales_core::models::Transaction;
use serde::Serialize;

use crate::grouping::{group_by, Reducer};

/// Number of products returned by [`top_selling_products`] by default.
pub const DEFAULT_TOP_N: usize = 5;

/// Quantity below which [`low_performing_products`] flags a product.
pub const DEFAULT_LOW_THRESHOLD: i64 = 10;

// ── Result types ──────────────────────────────────────────────────────────────

/// Sales attributed to one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSales {
    pub region: String,
    pub total_sales: f64,
    pub transaction_count: usize,
    /// Share of overall revenue, rounded to two decimals.
    pub percentage: f64,
}

/// Quantity and revenue for one product name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// Purchase pattern of one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub customer_id: String,
    pub total_spent: f64,
    pub purchase_count: usize,
    /// `total_spent / purchase_count`, rounded to two decimals.
    pub avg_order_value: f64,
    /// Distinct product names, alphabetical.
    pub products_bought: Vec<String>,
}

/// Revenue and activity for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

/// The highest-revenue date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakDay {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
}

// ── Reducers ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SalesTotals {
    revenue: f64,
    count: usize,
}

impl<'a> Reducer<'a> for SalesTotals {
    fn add(&mut self, txn: &'a Transaction) {
        self.revenue += txn.amount();
        self.count += 1;
    }
}

#[derive(Default)]
struct ProductTotals {
    quantity: i64,
    revenue: f64,
}

impl<'a> Reducer<'a> for ProductTotals {
    fn add(&mut self, txn: &'a Transaction) {
        self.quantity = self.quantity.saturating_add(txn.quantity);
        self.revenue += txn.amount();
    }
}

#[derive(Default)]
struct CustomerTotals<'a> {
    spent: SalesTotals,
    products: BTreeSet<&'a str>,
}

impl<'a> Reducer<'a> for CustomerTotals<'a> {
    fn add(&mut self, txn: &'a Transaction) {
        self.spent.add(txn);
        self.products.insert(txn.product_name.as_str());
    }
}

#[derive(Default)]
struct DayTotals<'a> {
    sales: SalesTotals,
    customers: HashSet<&'a str>,
}

impl<'a> Reducer<'a> for DayTotals<'a> {
    fn add(&mut self, txn: &'a Transaction) {
        self.sales.add(txn);
        self.customers.insert(txn.customer_id.as_str());
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// Sum of `quantity × unit_price` over every transaction.
pub fn calculate_total_revenue(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(Transaction::amount).sum()
}

/// Revenue per region, largest first.
pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<RegionSales> {
    let total = calculate_total_revenue(transactions);

    let mut regions: Vec<RegionSales> = group_by(transactions, |t| t.region.as_str())
        .into_iter()
        .map(|(region, totals): (&str, SalesTotals)| RegionSales {
            region: region.to_string(),
            total_sales: totals.revenue,
            transaction_count: totals.count,
            percentage: percentage(totals.revenue, total, 2),
        })
        .collect();

    regions.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    regions
}

/// The `n` products with the highest total quantity.
pub fn top_selling_products(transactions: &[Transaction], n: usize) -> Vec<ProductSales> {
    let mut products = product_totals(transactions);
    products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    products.truncate(n);
    products
}

/// Spending per customer, biggest spender first.
pub fn customer_analysis(transactions: &[Transaction]) -> Vec<CustomerSummary> {
    let mut customers: Vec<CustomerSummary> = group_by(transactions, |t| t.customer_id.as_str())
        .into_iter()
        .map(|(customer_id, totals): (&str, CustomerTotals)| {
            let avg = if totals.spent.count > 0 {
                round_to(totals.spent.revenue / totals.spent.count as f64, 2)
            } else {
                0.0
            };
            CustomerSummary {
                customer_id: customer_id.to_string(),
                total_spent: totals.spent.revenue,
                purchase_count: totals.spent.count,
                avg_order_value: avg,
                products_bought: totals.products.into_iter().map(str::to_string).collect(),
            }
        })
        .collect();

    customers.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    customers
}

/// Revenue per date, oldest first.
///
/// Dates are compared as strings, which orders ISO `YYYY-MM-DD` dates
/// chronologically.
pub fn daily_sales_trend(transactions: &[Transaction]) -> Vec<DailySales> {
    let mut days: Vec<DailySales> = group_by(transactions, |t| t.date.as_str())
        .into_iter()
        .map(|(date, totals): (&str, DayTotals)| DailySales {
            date: date.to_string(),
            revenue: totals.sales.revenue,
            transaction_count: totals.sales.count,
            unique_customers: totals.customers.len(),
        })
        .collect();

    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

/// The date with the most revenue, or `None` for an empty input.
pub fn find_peak_sales_day(transactions: &[Transaction]) -> Option<PeakDay> {
    peak_of(&daily_sales_trend(transactions))
}

/// The highest-revenue entry of an existing trend; the earliest wins a tie.
pub fn peak_of(trend: &[DailySales]) -> Option<PeakDay> {
    let best = trend.iter().fold(None::<&DailySales>, |best, day| match best {
        Some(b) if b.revenue >= day.revenue => Some(b),
        _ => Some(day),
    })?;

    Some(PeakDay {
        date: best.date.clone(),
        revenue: best.revenue,
        transaction_count: best.transaction_count,
    })
}

/// Products whose total quantity is below `threshold`, lowest first.
pub fn low_performing_products(transactions: &[Transaction], threshold: i64) -> Vec<ProductSales> {
    let mut products: Vec<ProductSales> = product_totals(transactions)
        .into_iter()
        .filter(|p| p.quantity < threshold)
        .collect();
    products.sort_by_key(|p| p.quantity);
    products
}

fn product_totals(transactions: &[Transaction]) -> Vec<ProductSales> {
    group_by(transactions, |t| t.product_name.as_str())
        .into_iter()
        .map(|(name, totals): (&str, ProductTotals)| ProductSales {
            name: name.to_string(),
            quantity: totals.quantity,
            revenue: totals.revenue,
        })
        .collect()
}

// ── SalesAnalysis ─────────────────────────────────────────────────────────────

/// Every aggregate computed over one transaction set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesAnalysis {
    pub total_revenue: f64,
    pub transaction_count: usize,
    pub regions: Vec<RegionSales>,
    pub top_products: Vec<ProductSales>,
    pub customers: Vec<CustomerSummary>,
    pub daily_trend: Vec<DailySales>,
    pub peak_day: Option<PeakDay>,
    pub low_performers: Vec<ProductSales>,
}

impl SalesAnalysis {
    /// Run every aggregate over `transactions`.
    pub fn compute(transactions: &[Transaction], top_n: usize, low_threshold: i64) -> Self {
        let daily_trend = daily_sales_trend(transactions);
        let peak_day = peak_of(&daily_trend);

        Self {
            total_revenue: calculate_total_revenue(transactions),
            transaction_count: transactions.len(),
            regions: region_wise_sales(transactions),
            top_products: top_selling_products(transactions, top_n),
            customers: customer_analysis(transactions),
            daily_trend,
            peak_day,
            low_performers: low_performing_products(transactions, low_threshold),
        }
    }

    /// Mean amount per transaction, `0.0` when empty.
    pub fn average_order_value(&self) -> f64 {
        if self.transaction_count == 0 {
            0.0
        } else {
            self.total_revenue / self.transaction_count as f64
        }
    }

    /// First and last date in the trend.
    pub fn date_range(&self) -> Option<(&str, &str)> {
        let first = self.daily_trend.first()?;
        let last = self.daily_trend.last()?;
        Some((first.date.as_str(), last.date.as_str()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
