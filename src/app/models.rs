//! Data models for workbook conversion
//!
//! This module contains the core data structures shared by the schema,
//! the sheet and file converters, and the dispatcher: row roles, sheets,
//! records, column metadata and the merged aggregate result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

// =============================================================================
// Row Format
// =============================================================================

/// Semantic role assigned to a row position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowRole {
    /// Regular data row, converted into a record
    #[default]
    #[serde(alias = "")]
    Data,
    /// Row holding the column keys
    Key,
    /// Row holding the declared value type of each column
    ValueType,
    /// Free-form comment row
    Comment,
}

impl RowRole {
    /// Whether rows with this role carry metadata rather than records
    pub fn is_metadata(&self) -> bool {
        !matches!(self, RowRole::Data)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowRole::Data => "data",
            RowRole::Key => "key",
            RowRole::ValueType => "value-type",
            RowRole::Comment => "comment",
        }
    }
}

impl fmt::Display for RowRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assignment of a role to a 1-based row position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFormatEntry {
    /// 1-based row index within a sheet
    pub position: usize,

    /// Role of the row at `position`
    #[serde(default)]
    pub role: RowRole,
}

impl RowFormatEntry {
    pub fn new(position: usize, role: RowRole) -> Self {
        Self { position, role }
    }
}

// =============================================================================
// Sheet Input
// =============================================================================

/// A named grid of text cells read from a workbook
///
/// Rows are stored in sheet order starting at row 1. A row may be shorter
/// than its neighbours; missing trailing cells read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Row at a 1-based position
    pub fn row(&self, position: usize) -> Option<&[String]> {
        position
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .map(Vec::as_slice)
    }

    /// Cell text at a 1-based row position and 0-based column, or `""`
    pub fn cell(&self, position: usize, column: usize) -> &str {
        self.row(position)
            .and_then(|row| row.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Conversion Output
// =============================================================================

/// One data row keyed by column name
pub type Record = BTreeMap<String, String>;

/// Column metadata produced in header mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Zero-based column position
    pub index: usize,

    /// Value-type label, verbatim from the value-type row
    #[serde(rename = "valueType")]
    pub value_type: String,
}

/// Column name to column metadata for one sheet
pub type SheetColumns = BTreeMap<String, ColumnInfo>;

/// Which shape sheets are converted into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversionMode {
    /// One record per surviving data row
    #[default]
    Records,
    /// Column name to index/value-type map, no records
    Header,
}

/// Converted content of a single sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetResult {
    Records(Vec<Record>),
    Columns(SheetColumns),
}

impl SheetResult {
    /// Number of records or columns held
    pub fn len(&self) -> usize {
        match self {
            SheetResult::Records(records) => records.len(),
            SheetResult::Columns(columns) => columns.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            SheetResult::Records(records) => Some(records),
            SheetResult::Columns(_) => None,
        }
    }

    pub fn as_columns(&self) -> Option<&SheetColumns> {
        match self {
            SheetResult::Columns(columns) => Some(columns),
            SheetResult::Records(_) => None,
        }
    }
}

/// Sheet name to converted sheet, merged across every processed file
///
/// Sheet names are unique; merging applies last-write-wins, so a later
/// file silently replaces an earlier file's sheet of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateResult {
    sheets: BTreeMap<String, SheetResult>,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one sheet, replacing any previous sheet with the same name
    pub fn insert(&mut self, sheet_name: impl Into<String>, result: SheetResult) {
        self.sheets.insert(sheet_name.into(), result);
    }

    /// Fold `other` into `self`; sheets in `other` win on name collision
    pub fn merge(&mut self, other: AggregateResult) {
        self.sheets.extend(other.sheets);
    }

    pub fn get(&self, sheet_name: &str) -> Option<&SheetResult> {
        self.sheets.get(sheet_name)
    }

    pub fn contains_sheet(&self, sheet_name: &str) -> bool {
        self.sheets.contains_key(sheet_name)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SheetResult> {
        self.sheets.iter()
    }
}

impl IntoIterator for AggregateResult {
    type Item = (String, SheetResult);
    type IntoIter = btree_map::IntoIter<String, SheetResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.into_iter()
    }
}

impl FromIterator<(String, SheetResult)> for AggregateResult {
    fn from_iter<I: IntoIterator<Item = (String, SheetResult)>>(iter: I) -> Self {
        Self {
            sheets: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(values: &[&str]) -> SheetResult {
        SheetResult::Records(
            values
                .iter()
                .map(|v| Record::from([("id".to_string(), v.to_string())]))
                .collect(),
        )
    }

    #[test]
    fn test_row_role_parsing() {
        #[derive(Deserialize)]
        struct Wrapper {
            role: RowRole,
        }

        let parse = |s: &str| {
            toml::from_str::<Wrapper>(&format!("role = \"{s}\""))
                .map(|w| w.role)
                .ok()
        };

        assert_eq!(parse("data"), Some(RowRole::Data));
        assert_eq!(parse(""), Some(RowRole::Data));
        assert_eq!(parse("key"), Some(RowRole::Key));
        assert_eq!(parse("value-type"), Some(RowRole::ValueType));
        assert_eq!(parse("comment"), Some(RowRole::Comment));
        assert_eq!(parse("header"), None);
    }

    #[test]
    fn test_row_role_default_is_data() {
        assert_eq!(RowRole::default(), RowRole::Data);
        assert!(!RowRole::Data.is_metadata());
        assert!(RowRole::Key.is_metadata());
        assert!(RowRole::ValueType.is_metadata());
        assert!(RowRole::Comment.is_metadata());
    }

    #[test]
    fn test_sheet_cell_lookup_pads_with_empty() {
        let sheet = Sheet::new(
            "s",
            vec![
                vec!["id".to_string(), "name".to_string()],
                vec!["1".to_string()],
            ],
        );

        assert_eq!(sheet.cell(1, 1), "name");
        assert_eq!(sheet.cell(2, 0), "1");
        assert_eq!(sheet.cell(2, 1), "");
        assert_eq!(sheet.cell(3, 0), "");
        assert_eq!(sheet.cell(0, 0), "");
        assert!(sheet.row(0).is_none());
    }

    #[test]
    fn test_aggregate_merge_is_last_write_wins() {
        let mut first = AggregateResult::new();
        first.insert("shared", records(&["1"]));
        first.insert("only_first", records(&["a"]));

        let mut second = AggregateResult::new();
        second.insert("shared", records(&["2"]));

        first.merge(second);

        assert_eq!(first.len(), 2);
        assert_eq!(first.get("shared"), Some(&records(&["2"])));
        assert!(first.contains_sheet("only_first"));
    }

    #[test]
    fn test_column_info_serializes_value_type_in_camel_case() {
        let info = ColumnInfo {
            index: 1,
            value_type: "string".to_string(),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"index":1,"valueType":"string"}"#);
    }

    #[test]
    fn test_aggregate_serializes_as_plain_object() {
        let mut aggregate = AggregateResult::new();
        aggregate.insert("sheet", records(&["1"]));

        let json = serde_json::to_string(&aggregate).unwrap();
        assert_eq!(json, r#"{"sheet":[{"id":"1"}]}"#);
    }
}
