//! Configuration model for supplier layouts and pricing profiles.
//!
//! Supplier dispatch is data, not code: every supplier maps to one
//! [`SupplierLayout`] value describing raw column positions, parsing quirks
//! and record-cleaning rules, so adding a supplier means adding a TOML table,
//! not a code branch. Profiles are an ordered list applied against the same
//! base table.

use crate::constants;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Line normalization strategy for a raw feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeMode {
    /// Whitespace-delimited feed: collapse quirks, then split on whitespace runs
    #[default]
    Spaces,
    /// Plain `;`-separated feed: split without other transformation
    Csv,
}

/// Text encoding of a raw feed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    Utf8,
    /// Windows-1250, the default for Polish supplier feeds
    #[default]
    Cp1250,
    Cp1251,
}

impl TextEncoding {
    /// Resolve to the `encoding_rs` decoder
    pub fn encoding(&self) -> &'static encoding_rs::Encoding {
        match self {
            TextEncoding::Utf8 => encoding_rs::UTF_8,
            TextEncoding::Cp1250 => encoding_rs::WINDOWS_1250,
            TextEncoding::Cp1251 => encoding_rs::WINDOWS_1251,
        }
    }
}

/// Column-index mapping from raw fields to the canonical record shape.
///
/// A `None` or out-of-range index yields an empty text field or a degraded
/// numeric value downstream, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnMap {
    pub code: Option<usize>,
    pub unicode: Option<usize>,
    pub brand: Option<usize>,
    pub name: Option<usize>,
    pub stock: Option<usize>,
    pub price: Option<usize>,
}

/// Declarative per-supplier description of a raw feed layout.
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierLayout {
    /// Numeric supplier identifier used for catalog replace-all semantics
    pub supplier_id: Option<i64>,

    /// Raw column positions for the canonical fields
    #[serde(default)]
    pub columns: ColumnMap,

    /// Index of the stock column used for row filtering. `None` disables
    /// stock filtering entirely (pure price files).
    pub stock_index: Option<usize>,

    /// Header sentinel token in the stock column (matched case-insensitively)
    #[serde(default = "default_stock_header_token")]
    pub stock_header_token: String,

    /// Numeric stand-in for the "> 5" threshold notation, if the feed uses it
    pub threshold_substitute: Option<u32>,

    /// Number of leading header lines to skip
    #[serde(default)]
    pub skip_rows: usize,

    /// Line normalization strategy
    #[serde(default)]
    pub normalize_mode: NormalizeMode,

    /// Raw file text encoding
    #[serde(default)]
    pub encoding: TextEncoding,

    /// Force `lookup_code = code` for suppliers whose feed has no distinct
    /// manufacturer-code column
    #[serde(default)]
    pub lookup_from_code: bool,
}

fn default_stock_header_token() -> String {
    constants::STOCK_HEADER_TOKEN.to_string()
}

/// All supplier layouts, keyed by supplier name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuppliersConfig {
    #[serde(default)]
    pub suppliers: HashMap<String, SupplierLayout>,
}

impl SuppliersConfig {
    /// Load supplier layouts from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("cannot read {}", path.display()), e))?;
        Ok(toml::from_str(&raw)?)
    }

    /// Look up a supplier layout by name. The original feeds are configured
    /// inconsistently cased, so exact, upper and lower spellings all match.
    pub fn layout(&self, supplier: &str) -> Result<&SupplierLayout> {
        self.suppliers
            .get(supplier)
            .or_else(|| self.suppliers.get(&supplier.to_uppercase()))
            .or_else(|| self.suppliers.get(&supplier.to_lowercase()))
            .ok_or_else(|| {
                Error::configuration(format!("no layout configured for supplier '{supplier}'"))
            })
    }
}

/// Output currency of a pricing profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Base currency of the supplier feeds; no conversion applied
    Eur,
    /// Converted via the externally supplied EUR→UAH rate
    Uah,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Eur => write!(f, "EUR"),
            Currency::Uah => write!(f, "UAH"),
        }
    }
}

/// Per-currency rounding precision, in decimal digits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rounding {
    #[serde(default = "default_eur_digits")]
    pub eur: u32,
    #[serde(default = "default_uah_digits")]
    pub uah: u32,
}

fn default_eur_digits() -> u32 {
    constants::DEFAULT_EUR_DIGITS
}

fn default_uah_digits() -> u32 {
    constants::DEFAULT_UAH_DIGITS
}

impl Default for Rounding {
    fn default() -> Self {
        Self {
            eur: constants::DEFAULT_EUR_DIGITS,
            uah: constants::DEFAULT_UAH_DIGITS,
        }
    }
}

impl Rounding {
    /// Digit count configured for a currency
    pub fn digits_for(&self, currency: Currency) -> u32 {
        match currency {
            Currency::Eur => self.eur,
            Currency::Uah => self.uah,
        }
    }
}

/// Serialization format of a published artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// One projected output column: canonical source field and exported header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputColumn {
    pub from: String,
    pub header: String,
}

/// CSV artifact options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CsvOptions {
    #[serde(default = "default_csv_delimiter")]
    pub delimiter: char,
}

fn default_csv_delimiter() -> char {
    constants::DEFAULT_CSV_DELIMITER
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: constants::DEFAULT_CSV_DELIMITER,
        }
    }
}

/// Exchange-rate parameters for currency-converting profiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateParams {
    /// Add-on over the official rate, in UAH
    #[serde(default = "default_add_uah")]
    pub add_uah: f64,
    /// Floor below which the effective rate is never allowed to drop
    #[serde(default = "default_min_rate")]
    pub min_rate: f64,
    /// Value used when the rate provider is unreachable
    #[serde(default = "default_fallback")]
    pub fallback: f64,
}

fn default_add_uah() -> f64 {
    constants::DEFAULT_RATE_ADD_UAH
}

fn default_min_rate() -> f64 {
    constants::DEFAULT_RATE_FLOOR
}

fn default_fallback() -> f64 {
    constants::DEFAULT_RATE_FALLBACK
}

impl Default for RateParams {
    fn default() -> Self {
        Self {
            add_uah: constants::DEFAULT_RATE_ADD_UAH,
            min_rate: constants::DEFAULT_RATE_FLOOR,
            fallback: constants::DEFAULT_RATE_FALLBACK,
        }
    }
}

/// One named output configuration applied to the shared base table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingProfile {
    pub name: String,

    /// Markup factor applied to the base price; must be positive
    pub factor: f64,

    /// Output currency
    pub currency_out: Currency,

    /// Artifact serialization format
    #[serde(default)]
    pub format: OutputFormat,

    /// Destination key prefix template; `{supplier}` is substituted with the
    /// lower-cased supplier name
    pub prefix: String,

    /// Whether this profile's rows are synced into the relational catalog
    #[serde(default)]
    pub catalog: bool,

    /// Output column projection
    #[serde(default)]
    pub columns: Vec<OutputColumn>,

    /// CSV options (ignored for XLSX artifacts)
    #[serde(default)]
    pub csv: CsvOptions,

    /// Rate parameters, required in practice for UAH profiles
    pub rate_params: Option<RateParams>,
}

impl PricingProfile {
    /// Resolve the destination prefix for a supplier, guaranteeing the
    /// trailing `/` the key convention requires.
    pub fn resolved_prefix(&self, supplier: &str) -> String {
        let mut prefix = self
            .prefix
            .replace("{supplier}", &supplier.to_lowercase());
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        prefix
    }
}

/// Ordered profile list plus the shared rounding table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default)]
    pub profiles: Vec<PricingProfile>,
    #[serde(default)]
    pub rounding: Rounding,
}

impl ProfilesConfig {
    /// Load profiles from a TOML file and validate markup factors
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("cannot read {}", path.display()), e))?;
        let config: ProfilesConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-positive markup factors at run start rather than producing
    /// zero or negative prices later
    pub fn validate(&self) -> Result<()> {
        for profile in &self.profiles {
            if !(profile.factor > 0.0) {
                return Err(Error::configuration(format!(
                    "profile '{}' has non-positive factor {}",
                    profile.name, profile.factor
                )));
            }
        }
        Ok(())
    }
}
