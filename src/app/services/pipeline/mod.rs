//! Run orchestration: one supplier feed in, one artifact per profile out
//!
//! A run materializes the feed files once, builds the base table once, then
//! fans out over the configured pricing profiles. Files created during
//! materialization live behind a [`TempFiles`] guard and are removed when
//! the run ends on any path.

#[cfg(test)]
pub mod tests;

use crate::app::adapters::exchange::RateProvider;
use crate::app::adapters::fetch::{Fetcher, TempFiles};
use crate::app::models::PublishedArtifact;
use crate::app::services::output_builder::build_output_table;
use crate::app::services::pricing::apply_pricing;
use crate::app::services::publisher::Publisher;
use crate::app::services::record_processor::{BaseTableBuilder, BrandLookup, FeedFiles};
use crate::config::{Currency, ProfilesConfig, SuppliersConfig};
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Feed input of one run, as named on the command line.
#[derive(Debug, Clone)]
pub enum FeedInput {
    /// One combined price+stock resource
    Single(String),
    /// Named resources: `prices` (required), `stock` and `brands` (optional)
    Named(HashMap<String, String>),
}

const NAMED_KEYS: [&str; 3] = ["prices", "stock", "brands"];

/// Materialized local files of one run; lifetimes are bound to the run's
/// temp guard.
struct RunFiles {
    prices: PathBuf,
    stock: Option<PathBuf>,
    brands: Option<PathBuf>,
}

/// Orchestrates a full supplier run across all pricing profiles.
pub struct Pipeline {
    suppliers: SuppliersConfig,
    profiles: ProfilesConfig,
    fetcher: Arc<dyn Fetcher>,
    rates: Arc<dyn RateProvider>,
    publisher: Publisher,
}

impl Pipeline {
    pub fn new(
        suppliers: SuppliersConfig,
        profiles: ProfilesConfig,
        fetcher: Arc<dyn Fetcher>,
        rates: Arc<dyn RateProvider>,
        publisher: Publisher,
    ) -> Self {
        Self {
            suppliers,
            profiles,
            fetcher,
            rates,
            publisher,
        }
    }

    /// Run the full pipeline for one supplier.
    ///
    /// `supplier_id_override` takes precedence over the layout's configured
    /// id; `profile_filter` restricts the run to profiles whose name
    /// contains the filter, case-insensitive.
    pub async fn process(
        &self,
        supplier: &str,
        input: &FeedInput,
        supplier_id_override: Option<i64>,
        profile_filter: Option<&str>,
    ) -> Result<Vec<PublishedArtifact>> {
        let layout = self.suppliers.layout(supplier)?;
        let supplier_id = supplier_id_override.or(layout.supplier_id);

        let mut temps = TempFiles::new();
        let files = self.materialize(input, &mut temps).await?;

        let brands = match &files.brands {
            Some(path) => Some(BrandLookup::from_csv(path, layout.encoding)?),
            None => None,
        };
        let feed = match &files.stock {
            Some(stock) => FeedFiles::Split {
                prices: &files.prices,
                stock,
            },
            None => FeedFiles::Single(&files.prices),
        };
        let base = BaseTableBuilder::new(supplier, supplier_id, layout)
            .build(feed, brands.as_ref())?;

        let mut artifacts = Vec::new();
        for profile in &self.profiles.profiles {
            if let Some(filter) = profile_filter {
                if !profile
                    .name
                    .to_lowercase()
                    .contains(&filter.to_lowercase())
                {
                    debug!(profile = profile.name, filter, "profile skipped by filter");
                    continue;
                }
            }

            let rate = match profile.currency_out {
                Currency::Eur => 1.0,
                Currency::Uah => {
                    let params = profile.rate_params.unwrap_or_default();
                    self.rates.eur_to_uah(&params).await
                }
            };

            let priced = apply_pricing(
                base.records_owned(),
                profile.factor,
                profile.currency_out,
                rate,
                &self.profiles.rounding,
            );
            let digits = self.profiles.rounding.digits_for(profile.currency_out);
            let table = build_output_table(&priced, supplier_id, &profile.columns, digits);

            let artifact = self
                .publisher
                .publish_profile(profile, supplier, supplier_id, &priced, &table)
                .await?;
            artifacts.push(artifact);
        }

        info!(
            supplier,
            records = base.len(),
            artifacts = artifacts.len(),
            "run complete"
        );
        Ok(artifacts)
    }

    async fn materialize(&self, input: &FeedInput, temps: &mut TempFiles) -> Result<RunFiles> {
        match input {
            FeedInput::Single(resource) => Ok(RunFiles {
                prices: self.fetcher.materialize(resource, temps).await?,
                stock: None,
                brands: None,
            }),
            FeedInput::Named(map) => {
                for key in map.keys() {
                    if !NAMED_KEYS.contains(&key.as_str()) {
                        return Err(Error::configuration(format!(
                            "unknown feed input '{key}', expected one of {NAMED_KEYS:?}"
                        )));
                    }
                }
                let prices = map.get("prices").ok_or_else(|| {
                    Error::configuration("named feed input requires a 'prices' file")
                })?;
                let prices = self.fetcher.materialize(prices, temps).await?;
                let stock = match map.get("stock") {
                    Some(resource) => Some(self.fetcher.materialize(resource, temps).await?),
                    None => None,
                };
                let brands = match map.get("brands") {
                    Some(resource) => Some(self.fetcher.materialize(resource, temps).await?),
                    None => None,
                };
                Ok(RunFiles {
                    prices,
                    stock,
                    brands,
                })
            }
        }
    }
}
