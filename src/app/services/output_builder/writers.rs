//! Artifact serialization to delimited text and spreadsheet formats.

use crate::app::models::OutputTable;
use crate::{Error, Result};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::debug;

/// Write the output table as UTF-8 delimited text with a header row.
pub fn write_csv(table: &OutputTable, path: &Path, delimiter: char) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_path(path)?;

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .flush()
        .map_err(|e| Error::io(format!("cannot flush CSV artifact {}", path.display()), e))?;

    debug!(file = %path.display(), rows = table.len(), "wrote CSV artifact");
    Ok(())
}

/// Write the output table as a single-sheet XLSX workbook with a header row.
///
/// All cells are written as strings; the price column is already formatted
/// at the profile's digit count and spreadsheet consumers of these feeds
/// expect text cells.
pub fn write_xlsx(table: &OutputTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (row_index, row) in table.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            worksheet.write_string((row_index + 1) as u32, col as u16, cell)?;
        }
    }
    workbook.save(path)?;

    debug!(file = %path.display(), rows = table.len(), "wrote XLSX artifact");
    Ok(())
}
