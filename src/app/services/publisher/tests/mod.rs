//! Tests for catalog sync and versioned artifact publication


use crate::app::models::NormalizedRecord;

pub fn priced_record(code: &str, stock: i64, price: f64) -> NormalizedRecord {
    NormalizedRecord {
        code: code.to_string(),
        lookup_code: code.replace('-', ""),
        brand: "KNECHT".to_string(),
        name: "Oil filter".to_string(),
        stock,
        price,
    }
}
