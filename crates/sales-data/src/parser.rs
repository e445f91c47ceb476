//! Pipe-delimited line parsing.
//!
//! Lines that do not split into exactly eight fields, or whose quantity or
//! unit price is not numeric, are dropped without error. Dirty feeds are
//! expected; the validator reports business-rule failures separately.

use csv::{ReaderBuilder, StringRecord, Trim};
use sales_core::models::{Transaction, FIELD_COUNT, FIELD_DELIMITER};

/// Parse every line, keeping input order and skipping malformed lines.
pub fn parse_transactions<S: AsRef<str>>(lines: &[S]) -> Vec<Transaction> {
    lines
        .iter()
        .filter_map(|line| parse_line(line.as_ref()))
        .collect()
}

/// Parse one raw line into a [`Transaction`].
///
/// Commas are removed from the product name and from the numeric fields
/// (`"1,500"` → `1500`). Every string field is trimmed. A unit price that
/// is not a finite number drops the line.
pub fn parse_line(line: &str) -> Option<Transaction> {
    let record = split_record(line)?;
    let fields: Vec<&str> = record.iter().collect();
    let [transaction_id, date, product_id, product_name, quantity, unit_price, customer_id, region] =
        <[&str; FIELD_COUNT]>::try_from(fields).ok()?;

    let quantity: i64 = strip_commas(quantity).trim().parse().ok()?;
    let unit_price: f64 = strip_commas(unit_price)
        .trim()
        .parse()
        .ok()
        .filter(|p: &f64| p.is_finite())?;

    Some(Transaction {
        transaction_id: transaction_id.trim().to_string(),
        date: date.trim().to_string(),
        product_id: product_id.trim().to_string(),
        product_name: strip_commas(product_name).trim().to_string(),
        quantity,
        unit_price,
        customer_id: customer_id.trim().to_string(),
        region: region.trim().to_string(),
    })
}

/// Split one line on the field delimiter. Quotes carry no meaning in the
/// log format, so they are kept as literal text.
fn split_record(line: &str) -> Option<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER as u8)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) if record.len() == FIELD_COUNT => Some(record),
        _ => None,
    }
}

fn strip_commas(s: &str) -> String {
    s.replace(',', "")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_basic() {
        let t = parse_line("T001|2024-12-01|P101|Laptop|2|45000|C001|North").unwrap();
        assert_eq!(t.transaction_id, "T001");
        assert_eq!(t.date, "2024-12-01");
        assert_eq!(t.product_id, "P101");
        assert_eq!(t.product_name, "Laptop");
        assert_eq!(t.quantity, 2);
        assert!((t.unit_price - 45_000.0).abs() < 1e-9);
        assert_eq!(t.customer_id, "C001");
        assert_eq!(t.region, "North");
    }

    #[test]
    fn test_parse_line_strips_commas() {
        let t = parse_line("T010|2024-12-03|P105|Mouse,Wireless|1,200|1,500.50|C004|East").unwrap();
        assert_eq!(t.product_name, "MouseWireless");
        assert_eq!(t.quantity, 1200);
        assert!((t.unit_price - 1500.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_line_trims_fields() {
        let t = parse_line(" T001 | 2024-12-01 | P101 | USB Cable | 3 | 250 | C009 | West ").unwrap();
        assert_eq!(t.transaction_id, "T001");
        assert_eq!(t.product_name, "USB Cable");
        assert_eq!(t.quantity, 3);
        assert_eq!(t.region, "West");
    }

    #[test]
    fn test_parse_line_seven_fields_dropped() {
        assert!(parse_line("T001|2024-12-01|P101|Laptop|2|45000|C001").is_none());
    }

    #[test]
    fn test_parse_line_nine_fields_dropped() {
        assert!(parse_line("T001|2024-12-01|P101|Laptop|2|45000|C001|North|extra").is_none());
    }

    #[test]
    fn test_parse_line_non_numeric_quantity_dropped() {
        assert!(parse_line("T001|2024-12-01|P101|Laptop|two|45000|C001|North").is_none());
    }

    #[test]
    fn test_parse_line_non_numeric_price_dropped() {
        assert!(parse_line("T001|2024-12-01|P101|Laptop|2|N/A|C001|North").is_none());
    }

    #[test]
    fn test_parse_line_non_finite_price_dropped() {
        assert!(parse_line("T001|2024-12-01|P101|Laptop|2|inf|C001|North").is_none());
        assert!(parse_line("T001|2024-12-01|P101|Laptop|2|NaN|C001|North").is_none());
    }

    #[test]
    fn test_parse_line_quotes_are_literal() {
        let t = parse_line("T001|2024-12-01|P101|\"Pro\" Laptop|2|45000|C001|North").unwrap();
        assert_eq!(t.product_name, "\"Pro\" Laptop");
    }

    #[test]
    fn test_parse_line_empty_dropped() {
        assert!(parse_line("").is_none());
    }

    #[test]
    fn test_parse_line_keeps_zero_and_negative_quantity() {
        // Business rules belong to the validator.
        assert_eq!(parse_line("T001|2024-12-01|P101|Laptop|0|45000|C001|North").unwrap().quantity, 0);
        assert_eq!(parse_line("T001|2024-12-01|P101|Laptop|-3|45000|C001|North").unwrap().quantity, -3);
    }

    #[test]
    fn test_parse_transactions_preserves_order_and_skips_bad_lines() {
        let lines = vec![
            "T001|2024-12-01|P101|Laptop|2|45000|C001|North".to_string(),
            "garbage".to_string(),
            "T002|2024-12-01|P102|Mouse|5|500|C002|North".to_string(),
            "T003|2024-12-02|P103|Keyboard|x|800|C003|South".to_string(),
        ];
        let parsed = parse_transactions(&lines);
        let ids: Vec<&str> = parsed.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["T001", "T002"]);
    }

    #[test]
    fn test_parse_transactions_empty() {
        let lines: Vec<String> = Vec::new();
        assert!(parse_transactions(&lines).is_empty());
    }
}
