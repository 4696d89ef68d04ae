//! Tests for record normalization, aggregation and enrichment

pub mod processor_tests;

use crate::app::models::NormalizedRecord;

/// Build a record with sensible defaults for aggregation tests
pub fn record(code: &str, stock: i64, price: f64) -> NormalizedRecord {
    NormalizedRecord {
        code: code.to_string(),
        lookup_code: code.to_string(),
        brand: "BRAND".to_string(),
        name: "part".to_string(),
        stock,
        price,
    }
}
