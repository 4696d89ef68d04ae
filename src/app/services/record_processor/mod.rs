//! Normalization, aggregation and enrichment of raw feed rows
//!
//! This module turns parsed [`RawRow`](crate::app::models::RawRow) sequences
//! into the immutable per-run [`BaseTable`](crate::app::models::BaseTable):
//!
//! - [`normalizer`] - column-map projection onto the canonical record shape
//! - [`aggregation`] - warehouse-duplicate collapsing and split-feed merging
//! - [`enrichment`] - brand-name substitution and lookup-code normalization
//! - [`processor`] - the [`BaseTableBuilder`] sequencing the above per feed mode

pub mod aggregation;
pub mod enrichment;
pub mod normalizer;
pub mod processor;

#[cfg(test)]
pub mod tests;

pub use enrichment::BrandLookup;
pub use processor::{BaseTableBuilder, FeedFiles};
