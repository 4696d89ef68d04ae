//! Command implementations for the pricefeed processor CLI

use crate::app::adapters::exchange::{NbuRateClient, RateProvider};
use crate::app::adapters::fetch::LocalFetcher;
use crate::app::services::pipeline::{FeedInput, Pipeline};
use crate::app::services::publisher::{Catalog, FsObjectStore, Publisher};
use crate::cli::args::{Args, Commands, ProcessArgs, RateArgs, SearchArgs};
use crate::config::{ProfilesConfig, RateParams, SuppliersConfig};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Main command dispatcher
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Process(args)) => run_process(args).await,
        Some(Commands::Rate(args)) => run_rate(args).await,
        Some(Commands::Search(args)) => run_search(args),
        None => unreachable!("main prints help when no command is given"),
    }
}

fn setup_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

async fn run_process(args: ProcessArgs) -> Result<()> {
    setup_logging(args.get_log_level());
    args.validate()?;

    let start = Instant::now();
    info!(supplier = args.supplier, "starting pricefeed run");
    debug!(?args, "process arguments");

    let suppliers = SuppliersConfig::load(&args.config_dir.join("suppliers.toml"))?;
    let profiles = ProfilesConfig::load(&args.config_dir.join("profiles.toml"))?;

    let temp_dir = args.resolved_temp_dir();
    let mut store = FsObjectStore::new(&args.store_root);
    if let Some(base) = &args.public_base {
        store = store.with_public_base(base);
    }
    let mut publisher = Publisher::new(Arc::new(store), args.catalog_db.clone(), &temp_dir);
    if let Some(keep_last) = args.keep_last {
        publisher = publisher.with_keep_last(keep_last);
    }

    let pipeline = Pipeline::new(
        suppliers,
        profiles,
        Arc::new(LocalFetcher::new(&temp_dir)),
        Arc::new(NbuRateClient::new()),
        publisher,
    );

    let input = match &args.input {
        Some(resource) => FeedInput::Single(resource.clone()),
        None => FeedInput::Named(
            args.files
                .iter()
                .map(|f| (f.key.clone(), f.path.clone()))
                .collect::<HashMap<_, _>>(),
        ),
    };

    let artifacts = pipeline
        .process(
            &args.supplier,
            &input,
            args.supplier_id,
            args.profile.as_deref(),
        )
        .await?;

    println!(
        "Published {} artifact(s) for {} in {:.1}s",
        artifacts.len(),
        args.supplier,
        start.elapsed().as_secs_f64()
    );
    for artifact in &artifacts {
        println!(
            "  {:<12} x{:<5} {:<4} {}",
            artifact.profile, artifact.factor, artifact.currency, artifact.url
        );
    }
    Ok(())
}

async fn run_rate(args: RateArgs) -> Result<()> {
    setup_logging("warn");

    let params = RateParams {
        add_uah: args.add_uah,
        min_rate: args.min_rate,
        fallback: args.fallback,
    };
    let rate = NbuRateClient::new().eur_to_uah(&params).await;
    println!("{rate:.2}");
    Ok(())
}

fn run_search(args: SearchArgs) -> Result<()> {
    setup_logging("warn");

    // Opening would create an empty database at a mistyped path and report
    // "no matches" instead of the actual mistake
    if !args.catalog_db.is_file() {
        return Err(Error::configuration(format!(
            "catalog database does not exist: {}",
            args.catalog_db.display()
        )));
    }

    let catalog = Catalog::open(&args.catalog_db)?;
    let rows = catalog.search(&args.query, args.limit)?;
    if rows.is_empty() {
        println!("No matches for '{}'", args.query);
        return Ok(());
    }

    for row in rows {
        println!(
            "{:>4}  {:<20} {:<15} {:<40} {:>6}  {:>10.2}",
            row.supplier_id, row.code, row.brand, row.name, row.stock, row.price
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn search_against_a_missing_catalog_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("typo.db");

        let err = run_search(SearchArgs {
            query: "OF935".to_string(),
            catalog_db: missing.clone(),
            limit: 20,
        })
        .unwrap_err();

        assert!(matches!(err, Error::Configuration { .. }));
        // The mistyped path must not have been created as an empty database
        assert!(!missing.exists());
    }

    #[test]
    fn search_works_against_an_existing_catalog_file() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("catalog.db");
        // Initialize the schema the way publication would
        drop(Catalog::open(&db).unwrap());

        let result = run_search(SearchArgs {
            query: "OF935".to_string(),
            catalog_db: db,
            limit: 20,
        });
        assert!(result.is_ok());
    }
}
