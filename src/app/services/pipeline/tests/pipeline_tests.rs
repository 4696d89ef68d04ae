use crate::app::adapters::exchange::FixedRate;
use crate::app::adapters::fetch::LocalFetcher;
use crate::app::services::pipeline::{FeedInput, Pipeline};
use crate::app::services::publisher::{FsObjectStore, Publisher};
use crate::config::{
    ColumnMap, CsvOptions, Currency, NormalizeMode, OutputColumn, OutputFormat, PricingProfile,
    ProfilesConfig, Rounding, SupplierLayout, SuppliersConfig, TextEncoding,
};
use crate::Error;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn csv_layout() -> SupplierLayout {
    SupplierLayout {
        supplier_id: Some(7),
        columns: ColumnMap {
            code: Some(0),
            unicode: None,
            brand: None,
            name: None,
            stock: Some(1),
            price: Some(2),
        },
        stock_index: Some(1),
        stock_header_token: "STAN".to_string(),
        threshold_substitute: None,
        skip_rows: 0,
        normalize_mode: NormalizeMode::Csv,
        encoding: TextEncoding::Utf8,
        lookup_from_code: false,
    }
}

fn profile(name: &str, factor: f64, currency: Currency) -> PricingProfile {
    PricingProfile {
        name: name.to_string(),
        factor,
        currency_out: currency,
        format: OutputFormat::Csv,
        prefix: format!("prices/{{supplier}}/{name}"),
        catalog: false,
        columns: vec![
            OutputColumn {
                from: "code".to_string(),
                header: "code".to_string(),
            },
            OutputColumn {
                from: "stock".to_string(),
                header: "stock".to_string(),
            },
            OutputColumn {
                from: "price".to_string(),
                header: "price".to_string(),
            },
        ],
        csv: CsvOptions::default(),
        rate_params: None,
    }
}

fn make_pipeline(store_root: &Path, scratch: &Path, profiles: Vec<PricingProfile>) -> Pipeline {
    let suppliers = SuppliersConfig {
        suppliers: HashMap::from([("autopartner".to_string(), csv_layout())]),
    };
    let profiles = ProfilesConfig {
        profiles,
        rounding: Rounding::default(),
    };
    Pipeline::new(
        suppliers,
        profiles,
        Arc::new(LocalFetcher::new(scratch)),
        Arc::new(FixedRate(48.6)),
        Publisher::new(Arc::new(FsObjectStore::new(store_root)), None, scratch),
    )
}

fn stored_text(store_root: &Path, key: &str) -> String {
    std::fs::read_to_string(store_root.join(key)).unwrap()
}

#[tokio::test]
async fn single_file_run_collapses_duplicates_and_prices() {
    let store = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let feed = scratch.path().join("feed.csv");
    std::fs::write(&feed, "AB1;4;10,00\nAB1;6;10,00\nCD2;3;5,50\n").unwrap();

    let pipeline = make_pipeline(
        store.path(),
        scratch.path(),
        vec![profile("site", 1.3, Currency::Eur)],
    );
    let input = FeedInput::Single(feed.to_string_lossy().into_owned());
    let artifacts = pipeline
        .process("autopartner", &input, None, None)
        .await
        .unwrap();

    assert_eq!(artifacts.len(), 1);
    let content = stored_text(store.path(), &artifacts[0].key);
    assert_eq!(content, "code;stock;price\nAB1;10;13.00\nCD2;3;7.15\n");
}

#[tokio::test]
async fn split_feed_sums_stock_and_drops_price_only_codes() {
    let store = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let prices = scratch.path().join("prices.csv");
    let stock = scratch.path().join("stock.csv");
    std::fs::write(&prices, "X9;0;20,00\nORPHAN;0;9,99\n").unwrap();
    std::fs::write(&stock, "X9;3;0\nX9;7;0\n").unwrap();

    let pipeline = make_pipeline(
        store.path(),
        scratch.path(),
        vec![profile("site", 1.0, Currency::Eur)],
    );
    let input = FeedInput::Named(HashMap::from([
        ("prices".to_string(), prices.to_string_lossy().into_owned()),
        ("stock".to_string(), stock.to_string_lossy().into_owned()),
    ]));
    let artifacts = pipeline
        .process("autopartner", &input, None, None)
        .await
        .unwrap();

    let content = stored_text(store.path(), &artifacts[0].key);
    assert_eq!(content, "code;stock;price\nX9;10;20.00\n");
}

#[tokio::test]
async fn uah_profile_converts_with_the_provided_rate() {
    let store = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let feed = scratch.path().join("feed.csv");
    std::fs::write(&feed, "AB1;4;10,00\n").unwrap();

    let pipeline = make_pipeline(
        store.path(),
        scratch.path(),
        vec![profile("retail", 1.2, Currency::Uah)],
    );
    let input = FeedInput::Single(feed.to_string_lossy().into_owned());
    let artifacts = pipeline
        .process("autopartner", &input, None, None)
        .await
        .unwrap();

    // 10.00 * 1.2 * 48.6 = 583.2, UAH rounds to whole units
    let content = stored_text(store.path(), &artifacts[0].key);
    assert_eq!(content, "code;stock;price\nAB1;4;583\n");
}

#[tokio::test]
async fn profile_filter_selects_by_substring() {
    let store = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let feed = scratch.path().join("feed.csv");
    std::fs::write(&feed, "AB1;4;10,00\n").unwrap();

    let pipeline = make_pipeline(
        store.path(),
        scratch.path(),
        vec![
            profile("site", 1.3, Currency::Eur),
            profile("wholesale", 1.1, Currency::Eur),
        ],
    );
    let input = FeedInput::Single(feed.to_string_lossy().into_owned());
    let artifacts = pipeline
        .process("autopartner", &input, None, Some("SITE"))
        .await
        .unwrap();

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].profile, "site");
}

#[tokio::test]
async fn unknown_supplier_is_a_configuration_error() {
    let store = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let pipeline = make_pipeline(store.path(), scratch.path(), vec![]);

    let input = FeedInput::Single("/irrelevant.csv".to_string());
    let err = pipeline
        .process("nobody", &input, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[tokio::test]
async fn named_input_without_prices_is_rejected() {
    let store = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let pipeline = make_pipeline(store.path(), scratch.path(), vec![]);

    let input = FeedInput::Named(HashMap::from([(
        "stock".to_string(),
        "/somewhere.csv".to_string(),
    )]));
    let err = pipeline
        .process("autopartner", &input, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
