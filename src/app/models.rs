//! Canonical data model for supplier feed processing.

use crate::config::Currency;
use serde::Serialize;

/// One parsed line of a raw feed: an ordered sequence of string fields with
/// no semantic meaning until mapped through a supplier layout.
pub type RawRow = Vec<String>;

/// The canonical product record every supplier feed normalizes into.
///
/// Invariants after aggregation/enrichment:
/// - `lookup_code` contains only upper-case alphanumerics
/// - `stock` is non-negative
/// - `price` may be NaN for unparseable inputs; pricing coerces NaN to zero
///   and never lets it reach an output artifact
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Supplier product code, trimmed and upper-cased
    pub code: String,
    /// Manufacturer/search code; defaults to `code` when the feed lacks one
    pub lookup_code: String,
    pub brand: String,
    pub name: String,
    pub stock: i64,
    pub price: f64,
}

impl NormalizedRecord {
    /// Grouping key over every field except stock, used to collapse
    /// warehouse duplicates in single-file feeds. The price component is
    /// compared bitwise so NaN prices group together.
    pub fn dedup_key(&self) -> (String, String, String, String, u64) {
        (
            self.code.clone(),
            self.lookup_code.clone(),
            self.brand.clone(),
            self.name.clone(),
            self.price.to_bits(),
        )
    }
}

/// The post-aggregation, post-merge, post-enrichment product table for one
/// supplier run.
///
/// Built exactly once per run and shared read-only across all profile
/// iterations; pricing always operates on an owned copy of the records.
#[derive(Debug, Clone)]
pub struct BaseTable {
    supplier: String,
    supplier_id: Option<i64>,
    records: Vec<NormalizedRecord>,
}

impl BaseTable {
    pub fn new(
        supplier: impl Into<String>,
        supplier_id: Option<i64>,
        records: Vec<NormalizedRecord>,
    ) -> Self {
        Self {
            supplier: supplier.into(),
            supplier_id,
            records,
        }
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn supplier_id(&self) -> Option<i64> {
        self.supplier_id
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Owned copy of the records for a single profile iteration
    pub fn records_owned(&self) -> Vec<NormalizedRecord> {
        self.records.clone()
    }
}

/// Profile output projected onto its configured column set; cells are
/// already formatted for serialization.
#[derive(Debug, Clone, Default)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One uploaded artifact, returned as part of the run summary. Ephemeral:
/// not persisted beyond the run's result.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedArtifact {
    pub profile: String,
    pub factor: f64,
    pub currency: Currency,
    pub key: String,
    pub url: String,
}
