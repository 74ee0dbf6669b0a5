//! JSON output
//!
//! Serializes an [`AggregateResult`] and persists it, either as one JSON
//! document keyed by sheet name or as one file per sheet inside a
//! directory. Any serialization or write failure is fatal, as is a pair
//! of sheet names that map to the same per-sheet file.

use crate::app::models::{AggregateResult, SheetResult};
use crate::constants::JSON_EXTENSION;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where converted output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Single JSON document at this path
    File(PathBuf),
    /// One `<sheet>.json` per sheet inside this directory
    PerSheet(PathBuf),
}

/// Written file and its size in bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// JSON serializer and writer
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent the output for reading
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Serialize any value using this writer's formatting
    pub fn to_bytes<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        bytes.map_err(|e| Error::serialization("Failed to serialize conversion result", e))
    }

    /// Persist `result` to `target`
    pub fn write(&self, result: &AggregateResult, target: &OutputTarget) -> Result<Vec<WrittenFile>> {
        match target {
            OutputTarget::File(path) => Ok(vec![self.write_document(result, path)?]),
            OutputTarget::PerSheet(dir) => self.write_per_sheet(result, dir),
        }
    }

    /// Write the whole result as one document
    pub fn write_document(&self, result: &AggregateResult, path: &Path) -> Result<WrittenFile> {
        let bytes = self.to_bytes(result)?;
        write_file(path, &bytes)
    }

    /// Write each sheet's value to `<dir>/<sheet>.json`
    pub fn write_per_sheet(&self, result: &AggregateResult, dir: &Path) -> Result<Vec<WrittenFile>> {
        let targets = sheet_output_paths(result, dir)?;

        fs::create_dir_all(dir).map_err(|e| {
            Error::io(format!("Failed to create output directory {}", dir.display()), e)
        })?;

        let mut written = Vec::with_capacity(targets.len());
        for (path, sheet) in targets {
            let bytes = self.to_bytes(sheet)?;
            written.push(write_file(&path, &bytes)?);
        }

        info!(
            "Wrote {} sheet files into {}",
            written.len(),
            dir.display()
        );
        Ok(written)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<WrittenFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::io(format!("Failed to create directory {}", parent.display()), e)
        })?;
    }

    fs::write(path, bytes)
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());

    Ok(WrittenFile {
        path: path.to_path_buf(),
        bytes: bytes.len() as u64,
    })
}

/// Output path for every sheet, failing if two sheets share a file name
fn sheet_output_paths<'a>(
    result: &'a AggregateResult,
    dir: &Path,
) -> Result<Vec<(PathBuf, &'a SheetResult)>> {
    let mut owners: HashMap<PathBuf, &str> = HashMap::with_capacity(result.len());
    let mut targets = Vec::with_capacity(result.len());

    for (sheet_name, sheet) in result.iter() {
        let path = dir.join(format!("{}.{}", sheet_file_stem(sheet_name), JSON_EXTENSION));
        if let Some(first) = owners.insert(path.clone(), sheet_name) {
            return Err(Error::OutputCollision {
                path,
                first: first.to_string(),
                second: sheet_name.clone(),
            });
        }
        targets.push((path, sheet));
    }

    Ok(targets)
}

/// Sheet name usable as a file name
fn sheet_file_stem(sheet_name: &str) -> String {
    sheet_name.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{ColumnInfo, Record, SheetColumns};
    use tempfile::TempDir;

    fn sample() -> AggregateResult {
        let record: Record = [("id", "1"), ("name", "Alpha")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let columns: SheetColumns = [(
            "id".to_string(),
            ColumnInfo {
                index: 0,
                value_type: "int".to_string(),
            },
        )]
        .into_iter()
        .collect();

        let mut result = AggregateResult::new();
        result.insert("sheet", SheetResult::Records(vec![record]));
        result.insert("a/b", SheetResult::Columns(columns));
        result
    }

    #[test]
    fn test_write_single_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("result.json");

        let written = JsonWriter::new()
            .write(&sample(), &OutputTarget::File(path.clone()))
            .unwrap();

        assert_eq!(written.len(), 1);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            r#"{"a/b":{"id":{"index":0,"valueType":"int"}},"sheet":[{"id":"1","name":"Alpha"}]}"#
        );
        assert_eq!(written[0].bytes, content.len() as u64);
    }

    #[test]
    fn test_write_per_sheet() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("sheets");

        let written = JsonWriter::new()
            .write(&sample(), &OutputTarget::PerSheet(dir.clone()))
            .unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read_to_string(dir.join("sheet.json")).unwrap(),
            r#"[{"id":"1","name":"Alpha"}]"#
        );
        assert!(dir.join("a_b.json").exists());
    }

    #[test]
    fn test_per_sheet_name_collision_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("sheets");

        let mut result = sample();
        result.insert("a_b", SheetResult::Records(Vec::new()));

        let err = JsonWriter::new()
            .write(&result, &OutputTarget::PerSheet(dir.clone()))
            .unwrap_err();

        match err {
            Error::OutputCollision {
                path,
                first,
                second,
            } => {
                assert_eq!(path, dir.join("a_b.json"));
                assert_eq!(first, "a/b");
                assert_eq!(second, "a_b");
            }
            other => panic!("Expected OutputCollision error, got {other:?}"),
        }
        // Nothing is written when names collide
        assert!(!dir.exists());
    }

    #[test]
    fn test_pretty_output_round_trips() {
        let bytes = JsonWriter::new().pretty(true).to_bytes(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains('\n'));

        let parsed: AggregateResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_unwritable_target_is_error() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be overwritten as a file
        let err = JsonWriter::new()
            .write_document(&sample(), temp_dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
