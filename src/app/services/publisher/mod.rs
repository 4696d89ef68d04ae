//! Profile publication: catalog sync plus versioned artifact export
//!
//! Two independent targets per profile. Catalog sync (catalog-facing
//! profiles only) atomically replaces the supplier's rows in the relational
//! store; its failure is caught and logged so the artifact export still
//! runs — a broken search index must not block customers' file downloads.
//! Artifact export serializes the output table, uploads it under the
//! profile prefix and prunes versions beyond the retention count.

pub mod catalog;
pub mod object_store;

#[cfg(test)]
pub mod tests;

pub use catalog::{Catalog, CatalogRow};
pub use object_store::{prune_prefix, FsObjectStore, ObjectStore, StoredObject};

use crate::app::models::{NormalizedRecord, OutputTable, PublishedArtifact};
use crate::app::services::output_builder::{artifact_file_name, write_csv, write_xlsx};
use crate::config::{OutputFormat, PricingProfile};
use crate::constants;
use crate::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Publishes one profile's output to the catalog store and object storage.
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
    catalog_path: Option<PathBuf>,
    temp_dir: PathBuf,
    keep_last: usize,
}

impl Publisher {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        catalog_path: Option<PathBuf>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            catalog_path,
            temp_dir: temp_dir.into(),
            keep_last: constants::KEEP_LAST_VERSIONS,
        }
    }

    /// Override the artifact retention count
    pub fn with_keep_last(mut self, keep_last: usize) -> Self {
        self.keep_last = keep_last;
        self
    }

    /// Publish one profile: optional catalog sync, then artifact export
    /// with retention pruning.
    ///
    /// Catalog sync errors are caught here (partial-success policy); upload
    /// errors propagate, but the local temp artifact is removed on every
    /// path.
    pub async fn publish_profile(
        &self,
        profile: &PricingProfile,
        supplier: &str,
        supplier_id: Option<i64>,
        priced_records: &[NormalizedRecord],
        table: &OutputTable,
    ) -> Result<PublishedArtifact> {
        let prefix = profile.resolved_prefix(supplier);

        if profile.catalog {
            self.sync_catalog(profile, supplier_id, priced_records);
        }

        let file_name = artifact_file_name(supplier, profile.format, &prefix, Local::now());
        let local_path = self.temp_dir.join(&file_name);
        match profile.format {
            OutputFormat::Csv => write_csv(table, &local_path, profile.csv.delimiter)?,
            OutputFormat::Xlsx => write_xlsx(table, &local_path)?,
        }

        let key = format!("{prefix}{file_name}");
        let uploaded = self
            .store
            .put_file(&local_path, &key, profile.format.content_type())
            .await;

        // The serialized artifact is temporary regardless of upload outcome
        if let Err(e) = std::fs::remove_file(&local_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(file = %local_path.display(), error = %e, "failed to remove temp artifact");
            }
        }

        let url = uploaded?;
        if let Err(e) = prune_prefix(self.store.as_ref(), &prefix, self.keep_last).await {
            warn!(prefix, error = %e, "retention pruning failed");
        }

        info!(profile = profile.name, key, "published artifact");
        Ok(PublishedArtifact {
            profile: profile.name.clone(),
            factor: profile.factor,
            currency: profile.currency_out,
            key,
            url,
        })
    }

    /// Replace the supplier's catalog rows, catching failure.
    ///
    /// Requires both a catalog path and a supplier id; a profile flagged
    /// catalog-facing without either is logged and skipped.
    fn sync_catalog(
        &self,
        profile: &PricingProfile,
        supplier_id: Option<i64>,
        priced_records: &[NormalizedRecord],
    ) {
        let (path, supplier_id) = match (&self.catalog_path, supplier_id) {
            (Some(path), Some(id)) => (path.as_path(), id),
            _ => {
                debug!(
                    profile = profile.name,
                    "catalog-facing profile without catalog path or supplier id, skipping sync"
                );
                return;
            }
        };

        match replace_rows(path, supplier_id, priced_records) {
            Ok(rows) => info!(profile = profile.name, rows, "catalog sync complete"),
            Err(e) => warn!(
                profile = profile.name,
                error = %e,
                "catalog sync failed, artifact export continues"
            ),
        }
    }
}

fn replace_rows(path: &Path, supplier_id: i64, records: &[NormalizedRecord]) -> Result<usize> {
    let mut catalog = Catalog::open(path)?;
    catalog.replace_supplier_rows(supplier_id, records)
}
