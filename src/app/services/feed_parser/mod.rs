//! Layout-driven parser for raw supplier feed files
//!
//! Turns a raw text file into an ordered sequence of field arrays, applying
//! layout-specific line normalization and stock-row filtering. The same
//! parser serves both "price" and "stock" files from one supplier: a layout
//! without a stock column index passes every non-empty row through
//! unfiltered.
//!
//! ## Architecture
//!
//! - [`parser`] - File decoding, row splitting and stock-row filtering
//! - [`line_normalizer`] - Whitespace-format quirks for `spaces`-mode feeds
//! - [`field_parsers`] - Degraded-value numeric coercion helpers

pub mod field_parsers;
pub mod line_normalizer;
pub mod parser;

#[cfg(test)]
pub mod tests;

pub use line_normalizer::normalize_spaces_line;
pub use parser::FeedParser;
