//! Core feed parsing: decoding, row splitting and stock-row filtering.

use super::line_normalizer::normalize_spaces_line;
use crate::app::models::RawRow;
use crate::config::{NormalizeMode, SupplierLayout};
use crate::constants;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Layout-driven parser producing ordered [`RawRow`] sequences from raw
/// feed files.
///
/// One parser instance serves one supplier layout. For split price/stock
/// feeds the price side is parsed with stock filtering disabled via
/// [`FeedParser::without_stock_filter`].
#[derive(Debug, Clone)]
pub struct FeedParser<'a> {
    layout: &'a SupplierLayout,
    stock_filtering: bool,
}

impl<'a> FeedParser<'a> {
    /// Create a parser for a supplier layout. Stock filtering is active
    /// whenever the layout configures a stock column index.
    pub fn new(layout: &'a SupplierLayout) -> Self {
        Self {
            layout,
            stock_filtering: true,
        }
    }

    /// Disable stock-row filtering, e.g. for the price file of a split feed
    /// that shares its layout with the stock file.
    pub fn without_stock_filter(mut self) -> Self {
        self.stock_filtering = false;
        self
    }

    /// Parse a raw feed file into rows, decoding with the layout encoding.
    ///
    /// Undecodable byte sequences are replaced rather than fatal; the feeds
    /// routinely contain stray bytes outside their nominal code page.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<RawRow>> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::io(format!("cannot read feed file {}", path.display()), e))?;
        let (text, _, had_errors) = self.layout.encoding.encoding().decode(&bytes);
        if had_errors {
            debug!(
                file = %path.display(),
                "feed contained undecodable bytes, replaced"
            );
        }

        let rows = self.parse_text(&text);
        info!(
            file = %path.display(),
            rows = rows.len(),
            "parsed raw feed"
        );
        Ok(rows)
    }

    /// Parse already-decoded feed text into rows.
    pub fn parse_text(&self, text: &str) -> Vec<RawRow> {
        let substitute = self
            .layout
            .threshold_substitute
            .unwrap_or(constants::DEFAULT_THRESHOLD_SUBSTITUTE);

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for (line_no, raw) in text.lines().enumerate() {
            if line_no < self.layout.skip_rows {
                continue;
            }
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let parts: RawRow = match self.layout.normalize_mode {
                NormalizeMode::Csv => raw.split(';').map(str::to_string).collect(),
                NormalizeMode::Spaces => normalize_spaces_line(raw, substitute)
                    .split(';')
                    .map(str::to_string)
                    .collect(),
            };
            if parts.is_empty() {
                continue;
            }

            match self.filter_stock_row(parts) {
                Some(row) => rows.push(row),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "dropped rows during stock filtering");
        }
        rows
    }

    /// Apply stock-row filtering: drop header-sentinel rows and rows whose
    /// stock field is non-numeric or non-positive. Returns the (possibly
    /// threshold-substituted) row when it passes.
    ///
    /// With filtering disabled or no stock index configured, every row
    /// passes unchanged.
    fn filter_stock_row(&self, mut parts: RawRow) -> Option<RawRow> {
        let index = match self.layout.stock_index {
            Some(index) if self.stock_filtering => index,
            _ => return Some(parts),
        };

        if index >= parts.len() {
            return None;
        }

        let mut value = parts[index].trim().to_string();

        // Header rows repeat the sentinel token in the stock column
        if value.to_lowercase() == self.layout.stock_header_token.to_lowercase() {
            return None;
        }

        // "> N" survives into csv-mode rows untouched by the line
        // normalizer; substitute it here when the layout asks for it
        if let Some(substitute) = self.layout.threshold_substitute {
            if value.contains('>') {
                value = substitute.to_string();
                parts[index] = value.clone();
            }
        }

        match value.parse::<f64>() {
            Ok(stock) if stock > 0.0 => Some(parts),
            _ => None,
        }
    }
}
