//! Workbook reading
//!
//! Opens spreadsheet files and exposes every sheet as ordered rows of
//! ordered cell text. The [`WorkbookReader`] trait is the seam the file
//! converter reads through; [`CalamineReader`] is the production
//! implementation and handles xlsx, xlsm, xlsb, xls and ods files.

use crate::app::models::Sheet;
use crate::{Error, Result};
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;
use tracing::debug;

/// Source of sheets for a workbook path
pub trait WorkbookReader: Send + Sync {
    /// Read every sheet of the workbook at `path`, in workbook order
    ///
    /// A file that cannot be opened or parsed yields [`Error::Workbook`].
    fn read_sheets(&self, path: &Path) -> Result<Vec<Sheet>>;
}

/// Workbook reader backed by calamine
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineReader;

impl WorkbookReader for CalamineReader {
    fn read_sheets(&self, path: &Path) -> Result<Vec<Sheet>> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| Error::workbook(path, e.to_string()))?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_owned();
        let mut sheets = Vec::with_capacity(sheet_names.len());

        for name in sheet_names {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                Error::workbook(path, format!("failed to read sheet '{}': {}", name, e))
            })?;
            let rows = range_to_rows(&range);
            debug!(
                "Read sheet '{}' from {}: {} rows",
                name,
                path.display(),
                rows.len()
            );
            sheets.push(Sheet::new(name, rows));
        }

        Ok(sheets)
    }
}

/// Lay a calamine range out from cell A1
///
/// calamine ranges start at the first populated cell, so leading empty rows
/// and columns are restored to keep row positions absolute. Trailing empty
/// cells are dropped from each row.
pub fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (row_offset, column_offset) = range
        .start()
        .map(|(row, column)| (row as usize, column as usize))
        .unwrap_or((0, 0));

    let mut rows = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells: Vec<String> = std::iter::repeat(String::new())
            .take(column_offset)
            .chain(row.iter().map(cell_text))
            .collect();

        while cells.last().is_some_and(|cell| cell.is_empty()) {
            cells.pop();
        }
        rows.push(cells);
    }

    rows
}

/// Text of a single cell, without type coercion beyond calamine's rendering
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
