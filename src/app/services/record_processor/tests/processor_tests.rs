//! Tests for base-table construction

use crate::app::services::record_processor::{BaseTableBuilder, FeedFiles};
use crate::config::{ColumnMap, NormalizeMode, SupplierLayout, TextEncoding};
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_layout() -> SupplierLayout {
    SupplierLayout {
        supplier_id: Some(3),
        columns: ColumnMap {
            code: Some(0),
            unicode: Some(1),
            brand: Some(2),
            name: Some(3),
            stock: Some(4),
            price: Some(5),
        },
        stock_index: Some(4),
        stock_header_token: "STAN".to_string(),
        threshold_substitute: Some(10),
        skip_rows: 0,
        normalize_mode: NormalizeMode::Csv,
        encoding: TextEncoding::Utf8,
        lookup_from_code: false,
    }
}

fn feed_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn single_file_build_collapses_warehouse_duplicates() {
    let feed = feed_file("AB1;AB 1;KN;Filter;4;10.00\nAB1;AB 1;KN;Filter;6;10.00\n");
    let layout = csv_layout();
    let builder = BaseTableBuilder::new("maxgear", Some(3), &layout);

    let table = builder.build(FeedFiles::Single(feed.path()), None).unwrap();
    assert_eq!(table.len(), 1);

    let record = &table.records()[0];
    assert_eq!(record.code, "AB1");
    assert_eq!(record.stock, 10);
    assert_eq!(record.lookup_code, "AB1");
    assert_eq!(table.supplier_id(), Some(3));
}

#[test]
fn split_build_merges_price_and_summed_stock() {
    let mut layout = csv_layout();
    // Split feeds here carry code/stock and code/price in the same slots
    layout.columns = ColumnMap {
        code: Some(0),
        stock: Some(1),
        price: Some(2),
        ..Default::default()
    };
    layout.stock_index = Some(1);

    let prices = feed_file("X9;;20.00\nGONE;;5.00\n");
    let stock = feed_file("X9;3\nX9;7\n");
    let builder = BaseTableBuilder::new("autopartner", Some(1), &layout);

    let table = builder
        .build(
            FeedFiles::Split {
                prices: prices.path(),
                stock: stock.path(),
            },
            None,
        )
        .unwrap();

    assert_eq!(table.len(), 1);
    let record = &table.records()[0];
    assert_eq!(record.code, "X9");
    assert_eq!(record.stock, 10);
    assert!((record.price - 20.0).abs() < 1e-9);
}

#[test]
fn lookup_from_code_layout_forces_canonical_code() {
    let mut layout = csv_layout();
    layout.lookup_from_code = true;

    let feed = feed_file("OF-935;WRONG;KN;Filter;2;9.99\n");
    let builder = BaseTableBuilder::new("gdansk", Some(2), &layout);

    let table = builder.build(FeedFiles::Single(feed.path()), None).unwrap();
    assert_eq!(table.records()[0].lookup_code, "OF935");
}
