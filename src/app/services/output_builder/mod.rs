//! Profile output construction
//!
//! Projects priced records onto a profile's configured column set and
//! serializes the result to the profile's artifact format. Configuration
//! and data drift is tolerated: an unknown source field becomes an empty
//! column so the output shape always matches the configured headers.

pub mod writers;

#[cfg(test)]
pub mod tests;

pub use writers::{write_csv, write_xlsx};

use crate::app::models::{NormalizedRecord, OutputTable};
use crate::config::{OutputColumn, OutputFormat};
use crate::constants;
use chrono::{DateTime, Local};

/// Format a final price at the profile currency's digit count.
pub fn format_price(price: f64, digits: u32) -> String {
    format!("{:.*}", digits as usize, price)
}

/// Project priced records onto a profile's `{from, header}` column list.
///
/// Available source fields: `code`, `unicode` (the canonical lookup code),
/// `brand`, `name`, `stock`, `price` and `supplier_id`. Anything else
/// yields an empty column rather than an error.
pub fn build_output_table(
    records: &[NormalizedRecord],
    supplier_id: Option<i64>,
    columns: &[OutputColumn],
    price_digits: u32,
) -> OutputTable {
    let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
    let supplier_id_cell = supplier_id.map(|id| id.to_string()).unwrap_or_default();

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| match column.from.as_str() {
                    "code" => record.code.clone(),
                    "unicode" => record.lookup_code.clone(),
                    "brand" => record.brand.clone(),
                    "name" => record.name.clone(),
                    "stock" => record.stock.to_string(),
                    "price" => format_price(record.price, price_digits),
                    "supplier_id" => supplier_id_cell.clone(),
                    _ => String::new(),
                })
                .collect()
        })
        .collect();

    OutputTable { headers, rows }
}

/// Short artifact tag derived from the destination prefix, distinguishing
/// the markup tier a file belongs to in its download listing.
pub fn artifact_tag(prefix: &str) -> &'static str {
    let prefix = prefix.to_lowercase();
    if prefix.contains("exist") {
        "exist"
    } else if prefix.contains("1_23") {
        "m"
    } else if prefix.contains("1_27") {
        "l"
    } else if prefix.contains("site") || prefix.contains("1_33") {
        "xl"
    } else {
        "data"
    }
}

/// Unique artifact file name: `price_{supplier}_{date}_{time}_{tag}.{ext}`,
/// all lower-case.
pub fn artifact_file_name(
    supplier: &str,
    format: OutputFormat,
    prefix: &str,
    stamp: DateTime<Local>,
) -> String {
    format!(
        "{}_{}_{}_{}_{}.{}",
        constants::ARTIFACT_FILE_PREFIX,
        supplier.to_lowercase(),
        stamp.format("%d.%m.%y"),
        stamp.format("%H%M%S"),
        artifact_tag(prefix),
        format.extension()
    )
}
