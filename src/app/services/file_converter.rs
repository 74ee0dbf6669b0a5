//! Per-file conversion
//!
//! Opens one workbook, converts each of its sheets and gathers them into
//! a per-file [`AggregateResult`]. A workbook that cannot be read comes
//! back as a recoverable [`Error::Workbook`](crate::Error::Workbook); the
//! dispatcher decides to log and skip it.

use crate::app::models::{AggregateResult, ConversionMode};
use crate::app::services::row_format::RowFormatSchema;
use crate::app::services::sheet_converter::SheetConverter;
use crate::app::services::workbook::{CalamineReader, WorkbookReader};
use crate::Result;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Converts whole workbook files under a shared schema
#[derive(Clone)]
pub struct FileConverter {
    schema: Arc<RowFormatSchema>,
    reader: Arc<dyn WorkbookReader>,
}

impl fmt::Debug for FileConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileConverter")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl FileConverter {
    /// Create a converter reading workbooks with calamine
    pub fn new(schema: Arc<RowFormatSchema>) -> Self {
        Self::with_reader(schema, Arc::new(CalamineReader))
    }

    /// Create a converter with a custom workbook reader
    pub fn with_reader(schema: Arc<RowFormatSchema>, reader: Arc<dyn WorkbookReader>) -> Self {
        Self { schema, reader }
    }

    /// Convert every sheet of the workbook at `path`
    ///
    /// Sheet names are unique within one workbook, so each sheet lands in
    /// the result under its own name.
    pub fn convert_file(&self, path: &Path, mode: ConversionMode) -> Result<AggregateResult> {
        let sheets = self.reader.read_sheets(path)?;
        let converter = SheetConverter::new(&self.schema);

        let result = sheets
            .iter()
            .map(|sheet| {
                converter
                    .convert(sheet, mode)
                    .map(|converted| (sheet.name.clone(), converted))
            })
            .collect::<Result<AggregateResult>>()?;

        debug!(
            "Converted {} sheets from {}",
            result.len(),
            path.display()
        );
        Ok(result)
    }
}
