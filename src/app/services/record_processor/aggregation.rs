//! Duplicate aggregation and split-feed merging.
//!
//! Suppliers report one row per warehouse, so the same product code appears
//! several times with different stock counts. Aggregation sums those counts;
//! merging joins a price feed with its authoritative stock feed.

use crate::app::models::NormalizedRecord;
use std::collections::HashMap;
use tracing::{debug, info};

/// Sum stock per product code, keeping the first-seen record's other fields
/// and first-seen order.
pub fn sum_stock_by_code(records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
    let input_len = records.len();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<NormalizedRecord> = Vec::new();

    for record in records {
        match positions.get(&record.code) {
            Some(&i) => out[i].stock += record.stock,
            None => {
                positions.insert(record.code.clone(), out.len());
                out.push(record);
            }
        }
    }

    if out.len() < input_len {
        debug!(
            input = input_len,
            unique = out.len(),
            "summed warehouse stock by code"
        );
    }
    out
}

/// Collapse duplicate records that differ only by warehouse stock count:
/// group on every field except stock and sum stock.
pub fn collapse_duplicates(records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
    let input_len = records.len();
    let mut positions: HashMap<(String, String, String, String, u64), usize> = HashMap::new();
    let mut out: Vec<NormalizedRecord> = Vec::new();

    for record in records {
        match positions.get(&record.dedup_key()) {
            Some(&i) => out[i].stock += record.stock,
            None => {
                positions.insert(record.dedup_key(), out.len());
                out.push(record);
            }
        }
    }

    if out.len() < input_len {
        debug!(
            input = input_len,
            unique = out.len(),
            "collapsed warehouse duplicates"
        );
    }
    out
}

/// Merge a price feed with its stock feed on product code.
///
/// The stock side is summed across warehouses first, then joined as an
/// inner join: codes absent from the stock feed are dropped rather than
/// defaulted to zero stock — the stock feed is the authoritative source
/// and a code it does not list is not sellable.
pub fn merge_price_stock(
    price_records: Vec<NormalizedRecord>,
    stock_records: Vec<NormalizedRecord>,
) -> Vec<NormalizedRecord> {
    let summed = sum_stock_by_code(stock_records);
    let totals: HashMap<String, i64> = summed
        .into_iter()
        .map(|record| (record.code, record.stock))
        .collect();

    let price_len = price_records.len();
    let merged: Vec<NormalizedRecord> = price_records
        .into_iter()
        .filter_map(|mut record| {
            totals.get(&record.code).map(|&stock| {
                record.stock = stock;
                record
            })
        })
        .collect();

    info!(
        price_rows = price_len,
        merged = merged.len(),
        dropped = price_len - merged.len(),
        "merged price and stock feeds"
    );
    merged
}
