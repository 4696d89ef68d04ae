//! Command-line argument definitions for the pricefeed processor

use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the pricefeed processor
///
/// Ingests supplier price/stock feeds, applies per-profile markup and
/// currency conversion, and publishes versioned artifacts plus a searchable
/// product catalog.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pricefeed-processor",
    version,
    about = "Ingest supplier price/stock feeds and publish priced catalogs"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the full pipeline for one supplier (default command)
    Process(ProcessArgs),
    /// Fetch and print the effective EUR→UAH rate
    Rate(RateArgs),
    /// Search the product catalog
    Search(SearchArgs),
}

/// One named feed file, given as `key=path` on the command line.
///
/// Recognized keys are `prices`, `stock` and `brands`.
#[derive(Debug, Clone)]
pub struct NamedFile {
    pub key: String,
    pub path: String,
}

impl FromStr for NamedFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (key, path) = s
            .split_once('=')
            .ok_or_else(|| Error::configuration(format!("expected key=path, got '{s}'")))?;
        if key.trim().is_empty() || path.trim().is_empty() {
            return Err(Error::configuration(format!("expected key=path, got '{s}'")));
        }
        Ok(NamedFile {
            key: key.trim().to_string(),
            path: path.trim().to_string(),
        })
    }
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Supplier name, as configured in suppliers.toml
    pub supplier: String,

    /// Single combined price+stock feed file (plain or .gz)
    ///
    /// Mutually exclusive with --file; suppliers delivering split feeds use
    /// --file instead.
    pub input: Option<String>,

    /// Named feed file as key=path; repeat for each file
    ///
    /// Keys: prices (required), stock, brands
    #[arg(long = "file", value_name = "KEY=PATH", conflicts_with = "input")]
    pub files: Vec<NamedFile>,

    /// Override the supplier id configured in the layout
    #[arg(long = "supplier-id", value_name = "ID")]
    pub supplier_id: Option<i64>,

    /// Only run profiles whose name contains this filter (case-insensitive)
    #[arg(short = 'p', long = "profile", value_name = "NAME")]
    pub profile: Option<String>,

    /// Directory containing suppliers.toml and profiles.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "DIR",
        default_value = "./config"
    )]
    pub config_dir: PathBuf,

    /// Path to the SQLite product catalog; catalog sync is skipped if absent
    #[arg(long = "catalog-db", value_name = "FILE")]
    pub catalog_db: Option<PathBuf>,

    /// Root directory of the published-artifact store
    #[arg(
        short = 's',
        long = "store",
        value_name = "DIR",
        default_value = "./published"
    )]
    pub store_root: PathBuf,

    /// Public base URL reported for published artifacts
    #[arg(long = "public-base", value_name = "URL")]
    pub public_base: Option<String>,

    /// Number of artifact versions to retain per storage prefix
    #[arg(long = "keep-last", value_name = "COUNT")]
    pub keep_last: Option<usize>,

    /// Scratch directory for decompressed feeds and serialized artifacts
    #[arg(long = "temp-dir", value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.input.is_none() && self.files.is_empty() {
            return Err(Error::configuration(
                "provide either a feed file or at least one --file key=path".to_string(),
            ));
        }

        if !self.config_dir.is_dir() {
            return Err(Error::configuration(format!(
                "config directory does not exist: {}",
                self.config_dir.display()
            )));
        }

        if self.keep_last == Some(0) {
            return Err(Error::configuration(
                "--keep-last must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Resolve the scratch directory, defaulting to the system temp dir
    pub fn resolved_temp_dir(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Arguments for the rate command
#[derive(Debug, Clone, Parser)]
pub struct RateArgs {
    /// Add-on over the official NBU rate, in UAH
    #[arg(long = "add-uah", value_name = "UAH", default_value_t = crate::constants::DEFAULT_RATE_ADD_UAH)]
    pub add_uah: f64,

    /// Floor below which the effective rate never drops
    #[arg(long = "min-rate", value_name = "RATE", default_value_t = crate::constants::DEFAULT_RATE_FLOOR)]
    pub min_rate: f64,

    /// Rate used when the provider is unreachable
    #[arg(long = "fallback", value_name = "RATE", default_value_t = crate::constants::DEFAULT_RATE_FALLBACK)]
    pub fallback: f64,
}

/// Arguments for the search command
#[derive(Debug, Clone, Parser)]
pub struct SearchArgs {
    /// Search query: product code, manufacturer code or brand prefix
    pub query: String,

    /// Path to the SQLite product catalog
    #[arg(long = "catalog-db", value_name = "FILE", default_value = "./catalog.db")]
    pub catalog_db: PathBuf,

    /// Maximum number of rows to print
    #[arg(short = 'n', long = "limit", value_name = "COUNT", default_value_t = 20)]
    pub limit: usize,
}
