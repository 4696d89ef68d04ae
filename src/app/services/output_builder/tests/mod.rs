//! Tests for output projection, naming and serialization

use crate::app::models::NormalizedRecord;
use crate::app::services::output_builder::{
    artifact_file_name, artifact_tag, build_output_table, write_csv,
};
use crate::config::{OutputColumn, OutputFormat};
use chrono::{Local, TimeZone};

fn column(from: &str, header: &str) -> OutputColumn {
    OutputColumn {
        from: from.to_string(),
        header: header.to_string(),
    }
}

fn sample_record() -> NormalizedRecord {
    NormalizedRecord {
        code: "AB1".to_string(),
        lookup_code: "AB1".to_string(),
        brand: "Knecht".to_string(),
        name: "Oil filter".to_string(),
        stock: 10,
        price: 13.0,
    }
}

#[test]
fn projects_configured_columns_with_custom_headers() {
    let columns = vec![
        column("code", "Artikel"),
        column("price", "Preis EUR"),
        column("stock", "Bestand"),
    ];
    let table = build_output_table(&[sample_record()], Some(7), &columns, 2);

    assert_eq!(table.headers, vec!["Artikel", "Preis EUR", "Bestand"]);
    assert_eq!(table.rows, vec![vec!["AB1", "13.00", "10"]]);
}

#[test]
fn unknown_source_field_becomes_an_empty_column() {
    let columns = vec![column("code", "code"), column("ean", "EAN")];
    let table = build_output_table(&[sample_record()], None, &columns, 2);

    assert_eq!(table.rows[0], vec!["AB1", ""]);
}

#[test]
fn supplier_id_column_is_available() {
    let columns = vec![column("supplier_id", "supplier_id")];
    let table = build_output_table(&[sample_record()], Some(3), &columns, 2);
    assert_eq!(table.rows[0], vec!["3"]);

    let table = build_output_table(&[sample_record()], None, &columns, 2);
    assert_eq!(table.rows[0], vec![""]);
}

#[test]
fn uah_prices_format_without_decimals() {
    let mut record = sample_record();
    record.price = 583.0;
    let table = build_output_table(&[record], None, &[column("price", "price")], 0);
    assert_eq!(table.rows[0], vec!["583"]);
}

#[test]
fn tag_is_derived_from_the_destination_prefix() {
    assert_eq!(artifact_tag("prices/autopartner/exist/"), "exist");
    assert_eq!(artifact_tag("prices/autopartner/1_23/"), "m");
    assert_eq!(artifact_tag("prices/autopartner/1_27/"), "l");
    assert_eq!(artifact_tag("prices/autopartner/site/"), "xl");
    assert_eq!(artifact_tag("prices/autopartner/1_33/"), "xl");
    assert_eq!(artifact_tag("prices/autopartner/misc/"), "data");
}

#[test]
fn artifact_file_name_encodes_supplier_date_time_and_tag() {
    let stamp = Local.with_ymd_and_hms(2026, 2, 8, 22, 30, 5).unwrap();
    let name = artifact_file_name("Autopartner", OutputFormat::Xlsx, "p/site/", stamp);
    assert_eq!(name, "price_autopartner_08.02.26_223005_xl.xlsx");
}

#[test]
fn csv_round_trip_preserves_code_stock_price() {
    let columns = vec![
        column("code", "code"),
        column("stock", "stock"),
        column("price", "price"),
    ];
    let table = build_output_table(&[sample_record()], None, &columns, 2);

    let file = tempfile::NamedTempFile::new().unwrap();
    write_csv(&table, file.path(), ';').unwrap();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(file.path())
        .unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "AB1");
    assert_eq!(rows[0][1].parse::<i64>().unwrap(), 10);
    assert!((rows[0][2].parse::<f64>().unwrap() - 13.0).abs() < 1e-9);
}
