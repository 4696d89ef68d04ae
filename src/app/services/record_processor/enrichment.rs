//! Brand-name enrichment and lookup-code canonicalization.

use crate::app::models::NormalizedRecord;
use crate::config::TextEncoding;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Lookup table substituting short supplier brand codes with full brand
/// names, loaded from a `;`-separated two-column file.
#[derive(Debug, Clone, Default)]
pub struct BrandLookup {
    names: HashMap<String, String>,
}

impl BrandLookup {
    /// Load `short;full` pairs from a delimited file in the feed's encoding.
    /// Rows without both columns are skipped.
    pub fn from_csv(path: &Path, encoding: TextEncoding) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::io(format!("cannot read brand file {}", path.display()), e))?;
        let (text, _, _) = encoding.encoding().decode(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut names = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| {
                Error::configuration(format!(
                    "malformed brand file {}: {e}",
                    path.display()
                ))
            })?;
            if let (Some(short), Some(full)) = (record.get(0), record.get(1)) {
                names.insert(short.trim().to_uppercase(), full.trim().to_string());
            }
        }

        info!(brands = names.len(), file = %path.display(), "loaded brand lookup");
        Ok(Self { names })
    }

    /// Full name for an upper-cased short brand code, if known
    pub fn resolve(&self, short: &str) -> Option<&str> {
        self.names.get(short).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Substitute short brand codes with full names.
///
/// Brands are trimmed/upper-cased first; the full name is preferred when a
/// match exists, and the upper-cased original kept otherwise.
pub fn apply_brand_names(records: &mut [NormalizedRecord], lookup: &BrandLookup) {
    let mut substituted = 0usize;
    for record in records.iter_mut() {
        record.brand = record.brand.trim().to_uppercase();
        if let Some(full) = lookup.resolve(&record.brand) {
            record.brand = full.to_string();
            substituted += 1;
        }
    }
    debug!(substituted, "applied full brand names");
}

/// Reduce a code to its canonical search form: alphanumerics only,
/// upper-cased. `"OF-935"`, `"OF 935"` and `"of935"` all collapse to
/// `"OF935"`.
pub fn strip_non_alnum_upper(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

/// Canonicalize every record's lookup code.
///
/// When the supplier layout flags `lookup_from_code` the feed has no
/// distinct manufacturer-code column and the product code is used instead;
/// in all cases the result is stripped to upper-case alphanumerics.
pub fn apply_lookup_normalization(records: &mut [NormalizedRecord], force_from_code: bool) {
    for record in records.iter_mut() {
        if force_from_code || record.lookup_code.is_empty() {
            record.lookup_code = record.code.clone();
        }
        record.lookup_code = strip_non_alnum_upper(&record.lookup_code);
    }
}
