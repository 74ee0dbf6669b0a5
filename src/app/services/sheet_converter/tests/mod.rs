//! Test utilities for sheet conversion
//!
//! Shared sheet builders used by the record and header mode tests.

use crate::app::models::Sheet;


/// Build a sheet from string-slice rows
pub fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
    Sheet::new(
        name,
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    )
}

/// The reference sheet: key, value-type and comment rows, then data
pub fn create_test_sheet() -> Sheet {
    sheet(
        "sheet",
        &[
            &["id", "name"],
            &["int", "string"],
            &["identifier", "display name"],
            &["1", "Alpha"],
            &["", "", ""],
            &["2", "Beta"],
        ],
    )
}
