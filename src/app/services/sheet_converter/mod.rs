//! Sheet conversion module
//!
//! Turns one [`Sheet`] into a [`SheetResult`] under a [`RowFormatSchema`].
//!
//! # Conversion Modes
//!
//! - **Records** ([`SheetConverter::to_records`]): column names come from the
//!   literal first row of the sheet. Every later row whose position the
//!   schema marks as metadata is skipped; every other row becomes a record
//!   keyed by column name, padded with empty strings where the row is
//!   shorter than the header. Rows whose values are all empty are dropped.
//! - **Header** ([`SheetConverter::to_header_map`]): column names come from
//!   the schema's key row and value types from its value-type row. No
//!   records are produced.
//!
//! The two modes read column names from different rows. Under the default
//! schema both are row 1; with a schema whose key row is not row 1 the
//! two modes can name the same column differently.

use crate::app::models::{
    ColumnInfo, ConversionMode, Record, RowRole, Sheet, SheetColumns, SheetResult,
};
use crate::app::services::row_format::RowFormatSchema;
use crate::constants::HEADER_ROW;
use crate::Result;
use tracing::{debug, trace};

#[cfg(test)]
mod tests;

/// Converts sheets under a borrowed schema
#[derive(Debug, Clone, Copy)]
pub struct SheetConverter<'a> {
    schema: &'a RowFormatSchema,
}

impl<'a> SheetConverter<'a> {
    pub fn new(schema: &'a RowFormatSchema) -> Self {
        Self { schema }
    }

    /// Convert a sheet in the requested mode
    ///
    /// Only header mode can fail, when the schema lacks a key or value-type
    /// row. That failure is a configuration problem and is fatal to the run.
    pub fn convert(&self, sheet: &Sheet, mode: ConversionMode) -> Result<SheetResult> {
        match mode {
            ConversionMode::Records => Ok(SheetResult::Records(self.to_records(sheet))),
            ConversionMode::Header => self.to_header_map(sheet).map(SheetResult::Columns),
        }
    }

    /// Extract one record per non-blank data row, in sheet order
    pub fn to_records(&self, sheet: &Sheet) -> Vec<Record> {
        let Some(header) = sheet.row(HEADER_ROW) else {
            debug!("Sheet '{}' has no header row", sheet.name);
            return Vec::new();
        };

        let mut records = Vec::new();
        for position in (HEADER_ROW + 1)..=sheet.row_count() {
            if self.schema.role_at(position).is_metadata() {
                continue;
            }

            let record: Record = header
                .iter()
                .enumerate()
                .map(|(column, name)| (name.clone(), sheet.cell(position, column).to_string()))
                .collect();

            if record.values().all(String::is_empty) {
                trace!("Skipping blank row {} in sheet '{}'", position, sheet.name);
                continue;
            }
            records.push(record);
        }

        debug!(
            "Sheet '{}': {} records from {} rows",
            sheet.name,
            records.len(),
            sheet.row_count()
        );
        records
    }

    /// Map each key-row column name to its index and declared value type
    pub fn to_header_map(&self, sheet: &Sheet) -> Result<SheetColumns> {
        let key_entry = self.schema.entry_by_role(RowRole::Key)?;
        let value_type_entry = self.schema.entry_by_role(RowRole::ValueType)?;

        let Some(key_row) = sheet.row(key_entry.position) else {
            debug!(
                "Sheet '{}' has no key row at position {}",
                sheet.name, key_entry.position
            );
            return Ok(SheetColumns::new());
        };

        let columns = key_row
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let value_type = sheet.cell(value_type_entry.position, index).to_string();
                (name.clone(), ColumnInfo { index, value_type })
            })
            .collect();

        Ok(columns)
    }
}
