//! Base-table construction: the one-per-run heavy stage.

use super::aggregation::{collapse_duplicates, merge_price_stock};
use super::enrichment::{apply_brand_names, apply_lookup_normalization, BrandLookup};
use super::normalizer::normalize_rows;
use crate::app::models::BaseTable;
use crate::app::services::feed_parser::FeedParser;
use crate::config::SupplierLayout;
use crate::Result;
use std::path::Path;
use tracing::info;

/// The raw feed files of one supplier run.
///
/// Which variant is present selects the aggregation mode: single-file
/// feeds collapse warehouse duplicates in place, split feeds merge the
/// price side with the summed stock side on product code.
#[derive(Debug, Clone, Copy)]
pub enum FeedFiles<'p> {
    /// One combined price+stock feed
    Single(&'p Path),
    /// Separate price and stock feeds sharing the same layout
    Split { prices: &'p Path, stock: &'p Path },
}

/// Builds the immutable per-run [`BaseTable`] from materialized feed files.
///
/// This stage runs exactly once per supplier run regardless of how many
/// pricing profiles follow; everything downstream operates on owned copies
/// of its output.
#[derive(Debug)]
pub struct BaseTableBuilder<'a> {
    supplier: &'a str,
    supplier_id: Option<i64>,
    layout: &'a SupplierLayout,
}

impl<'a> BaseTableBuilder<'a> {
    pub fn new(supplier: &'a str, supplier_id: Option<i64>, layout: &'a SupplierLayout) -> Self {
        Self {
            supplier,
            supplier_id,
            layout,
        }
    }

    /// Parse, normalize, aggregate and enrich the feed files into the
    /// shared base table.
    pub fn build(&self, files: FeedFiles<'_>, brands: Option<&BrandLookup>) -> Result<BaseTable> {
        let mut records = match files {
            FeedFiles::Single(feed) => {
                let rows = FeedParser::new(self.layout).parse_file(feed)?;
                collapse_duplicates(normalize_rows(&rows, &self.layout.columns))
            }
            FeedFiles::Split { prices, stock } => {
                let price_rows = FeedParser::new(self.layout)
                    .without_stock_filter()
                    .parse_file(prices)?;
                let stock_rows = FeedParser::new(self.layout).parse_file(stock)?;
                merge_price_stock(
                    normalize_rows(&price_rows, &self.layout.columns),
                    normalize_rows(&stock_rows, &self.layout.columns),
                )
            }
        };

        if let Some(lookup) = brands {
            apply_brand_names(&mut records, lookup);
        }
        apply_lookup_normalization(&mut records, self.layout.lookup_from_code);

        info!(
            supplier = self.supplier,
            records = records.len(),
            "base table ready"
        );
        Ok(BaseTable::new(self.supplier, self.supplier_id, records))
    }
}
