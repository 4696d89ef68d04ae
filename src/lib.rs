//! Pricefeed Processor Library
//!
//! A Rust library for ingesting heterogeneous supplier price/stock feeds
//! (fixed-width, space-delimited or CSV, in varying encodings) and publishing
//! priced product catalogs.
//!
//! This library provides tools for:
//! - Parsing raw supplier feeds with per-supplier layout descriptions
//! - Normalizing rows into one canonical product record shape
//! - Aggregating warehouse duplicates and merging split price/stock feeds
//! - Computing per-profile markup and currency-converted prices
//! - Publishing results to a relational catalog and versioned object storage
//!   with bounded retention

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod feed_parser;
        pub mod output_builder;
        pub mod pipeline;
        pub mod pricing;
        pub mod publisher;
        pub mod record_processor;
    }
    pub mod adapters {
        pub mod exchange;
        pub mod fetch;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{BaseTable, NormalizedRecord, PublishedArtifact};
pub use app::services::pipeline::Pipeline;
pub use config::{PricingProfile, SupplierLayout};

/// Result type alias for the pricefeed processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for feed processing operations.
///
/// Per-field parse failures are deliberately *not* represented here: the
/// normalizer degrades malformed numerics to `0`/`NaN` instead of failing the
/// run, so only transport, configuration, storage and export failures surface
/// as errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Feed fetch/materialization failed (transport unreachable, unsupported
    /// input type, decompression failure)
    #[error("fetch error for '{resource}': {message}")]
    Fetch { resource: String, message: String },

    /// Configuration error (missing supplier layout, malformed profile table)
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Catalog store operation failed
    #[error("catalog error: {message}")]
    Catalog {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Object storage upload/list/delete failed
    #[error("storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    /// Artifact serialization (CSV/XLSX) failed
    #[error("export error: {message}")]
    Export { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a fetch error for a named remote resource
    pub fn fetch(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a catalog error without an underlying driver error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
            source: None,
        }
    }

    /// Create an object storage error
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Catalog {
            message: "catalog operation failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Export {
            message: format!("CSV serialization failed: {error}"),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export {
            message: format!("XLSX serialization failed: {error}"),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("TOML parse failed: {error}"),
        }
    }
}
