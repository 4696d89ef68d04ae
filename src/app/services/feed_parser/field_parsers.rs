//! Degraded-value field coercion for raw feed rows.
//!
//! Malformed numerics never abort a run: stock degrades to `0`, price to
//! `NaN` (coerced to zero later by the pricing engine). Missing or
//! out-of-range column indices yield empty strings.

/// Fetch a field by optional column index, trimmed; missing or out-of-range
/// indices yield an empty string.
pub fn take_field(row: &[String], index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Parse a stock count via float-then-truncate.
///
/// Feeds print stock both as integers and as `4.0`; unparseable input
/// degrades to zero.
pub fn parse_stock(raw: &str) -> i64 {
    raw.trim().parse::<f64>().map(|v| v as i64).unwrap_or(0)
}

/// Parse a price string.
///
/// Comma decimal separators are converted to dots, then everything except
/// digits and dots is stripped (currency symbols, thousands spacers) before
/// parsing. Unparseable input degrades to NaN, not an error.
pub fn parse_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().unwrap_or(f64::NAN)
}
