//! Interactive filter selection.

use std::io::{BufRead, Write};

use sales_core::error::{Result, SalesError};
use sales_core::formatting::format_currency;
use sales_core::models::FilterOptions;
use sales_data::validator::FilterHints;

/// Print the filterable values in `hints` to `out`.
pub fn show_hints<W: Write>(out: &mut W, hints: &FilterHints, currency_symbol: &str) -> Result<()> {
    writeln!(out, "Regions: {}", hints.regions.join(", "))?;
    if let Some((lo, hi)) = hints.amount_range {
        writeln!(
            out,
            "Amount Range: {} - {}",
            format_currency(lo, currency_symbol, 2),
            format_currency(hi, currency_symbol, 2)
        )?;
    }
    Ok(())
}

/// Ask whether to filter and, if so, for a region and amount bounds.
///
/// Returns `None` when the user declines, so the caller keeps whatever
/// filters it already had. An empty answer skips that filter. End of input
/// counts as an empty answer.
pub fn prompt_filters<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<FilterOptions>> {
    let choice = ask(input, out, "\nDo you want to filter data? (y/n): ")?;
    if !choice.eq_ignore_ascii_case("y") {
        return Ok(None);
    }

    let region = ask(input, out, "Enter region to filter (or press Enter to skip): ")?;
    let min_amount = parse_amount(&ask(input, out, "Enter minimum amount (or press Enter to skip): ")?, "minimum")?;
    let max_amount = parse_amount(&ask(input, out, "Enter maximum amount (or press Enter to skip): ")?, "maximum")?;

    if let (Some(min), Some(max)) = (min_amount, max_amount) {
        if min > max {
            return Err(SalesError::InvalidFilter(format!(
                "minimum amount {} exceeds maximum amount {}",
                min, max
            )));
        }
    }

    Ok(Some(FilterOptions {
        region: (!region.is_empty()).then_some(region),
        min_amount,
        max_amount,
    }))
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<String> {
    write!(out, "{}", question)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn parse_amount(answer: &str, label: &str) -> Result<Option<f64>> {
    if answer.is_empty() {
        return Ok(None);
    }
    match answer.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(SalesError::InvalidFilter(format!(
            "{} amount must be a non-negative number, got '{}'",
            label, answer
        ))),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
