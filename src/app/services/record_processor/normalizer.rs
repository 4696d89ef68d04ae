//! Row-to-record normalization via the layout column mapping.

use crate::app::models::{NormalizedRecord, RawRow};
use crate::app::services::feed_parser::field_parsers::{parse_price, parse_stock, take_field};
use crate::config::ColumnMap;

/// Map raw rows onto the canonical record shape.
///
/// Missing or out-of-range indices yield empty strings (text) or degraded
/// numerics (stock 0, price NaN); nothing here raises. Codes are trimmed
/// and upper-cased so downstream joins and groupings compare cleanly.
/// The lookup code defaults to the product code, and the display name to
/// the brand, when the feed lacks those columns.
pub fn normalize_rows(rows: &[RawRow], columns: &ColumnMap) -> Vec<NormalizedRecord> {
    rows.iter().map(|row| normalize_row(row, columns)).collect()
}

fn normalize_row(row: &RawRow, columns: &ColumnMap) -> NormalizedRecord {
    let code = take_field(row, columns.code).to_uppercase();

    let lookup_code = {
        let raw = take_field(row, columns.unicode);
        if raw.is_empty() { code.clone() } else { raw }
    };

    let brand = take_field(row, columns.brand);
    let name = {
        let raw = take_field(row, columns.name);
        if raw.is_empty() { brand.clone() } else { raw }
    };

    NormalizedRecord {
        code,
        lookup_code,
        brand,
        name,
        stock: parse_stock(&take_field(row, columns.stock)),
        price: parse_price(&take_field(row, columns.price)),
    }
}
