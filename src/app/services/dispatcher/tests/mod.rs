//! Test utilities for dispatch
//!
//! Writes real workbooks into temporary directories so dispatch runs go
//! through the calamine reader end to end.

use crate::app::models::ConversionMode;
use crate::app::services::dispatcher::Dispatcher;
use crate::app::services::file_converter::FileConverter;
use crate::app::services::row_format::RowFormatSchema;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod sequential_tests;

/// Write an xlsx file with the given sheets; empty cells are left unwritten
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<&str>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Rows in the default layout (key, value type, comment) plus one data row
pub fn default_layout<'a>(id: &'a str, name: &'a str) -> Vec<Vec<&'a str>> {
    vec![
        vec!["id", "name"],
        vec!["int", "string"],
        vec!["identifier", "display name"],
        vec![id, name],
    ]
}

/// Write a workbook holding one default-layout sheet per name
pub fn write_simple_workbook(path: &Path, sheet_names: &[&str], id: &str) {
    let sheets: Vec<(&str, Vec<Vec<&str>>)> = sheet_names
        .iter()
        .map(|sheet| (*sheet, default_layout(id, sheet)))
        .collect();
    write_workbook(path, &sheets);
}

/// Write a file that cannot be opened as a workbook
pub fn write_corrupt_workbook(path: &Path) {
    fs::write(path, b"PK\x03\x04 definitely not a workbook").unwrap();
}

pub fn dispatcher(mode: ConversionMode) -> Dispatcher {
    let converter = FileConverter::new(Arc::new(RowFormatSchema::default()));
    Dispatcher::new(converter, mode)
}

pub fn paths(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|name| dir.join(name)).collect()
}
