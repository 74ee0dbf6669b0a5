//! Sequential dispatch tests

use super::*;
use crate::app::models::{ConversionMode, Record, RowFormatEntry, RowRole};
use crate::app::services::dispatcher::DispatchStrategy;
use crate::Error;
use tempfile::TempDir;

#[tokio::test]
async fn test_sequential_merges_all_files() {
    let temp_dir = TempDir::new().unwrap();
    let files = paths(temp_dir.path(), &["one.xlsx", "two.xlsx"]);
    write_simple_workbook(&files[0], &["sheet"], "1");
    write_simple_workbook(&files[1], &["nextSheet"], "2");

    let outcome = dispatcher(ConversionMode::Records)
        .dispatch(files, DispatchStrategy::Sequential)
        .await
        .unwrap();

    assert_eq!(outcome.stats.files_converted, 2);
    assert_eq!(outcome.stats.files_skipped(), 0);
    assert_eq!(outcome.stats.workers_used, 1);

    let sheet = outcome.result.get("sheet").unwrap().as_records().unwrap();
    let expected: Record = [("id", "1"), ("name", "sheet")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(sheet, &[expected]);
    assert!(outcome.result.contains_sheet("nextSheet"));
}

#[tokio::test]
async fn test_corrupt_file_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let files = paths(temp_dir.path(), &["a.xlsx", "b.xlsx", "c.xlsx"]);
    write_simple_workbook(&files[0], &["first"], "1");
    write_corrupt_workbook(&files[1]);
    write_simple_workbook(&files[2], &["third"], "3");

    let outcome = dispatcher(ConversionMode::Records)
        .dispatch(files.clone(), DispatchStrategy::Sequential)
        .await
        .unwrap();

    let names: Vec<&str> = outcome.result.sheet_names().collect();
    assert_eq!(names, vec!["first", "third"]);
    assert_eq!(outcome.stats.files_converted, 2);
    assert_eq!(outcome.stats.skipped_files, vec![files[1].clone()]);
}

#[tokio::test]
async fn test_later_file_wins_sheet_collision() {
    let temp_dir = TempDir::new().unwrap();
    let files = paths(temp_dir.path(), &["old.xlsx", "new.xlsx"]);
    write_simple_workbook(&files[0], &["shared"], "old");
    write_simple_workbook(&files[1], &["shared"], "new");

    let outcome = dispatcher(ConversionMode::Records)
        .dispatch(files, DispatchStrategy::Sequential)
        .await
        .unwrap();

    let records = outcome.result.get("shared").unwrap().as_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], "new");
}

#[tokio::test]
async fn test_header_mode_without_value_type_row_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let files = paths(temp_dir.path(), &["a.xlsx"]);
    write_simple_workbook(&files[0], &["sheet"], "1");

    let schema = RowFormatSchema::new(vec![RowFormatEntry::new(1, RowRole::Key)]).unwrap();
    let converter = FileConverter::new(Arc::new(schema));
    let result = Dispatcher::new(converter, ConversionMode::Header)
        .dispatch(files, DispatchStrategy::Sequential)
        .await;

    assert!(matches!(
        result,
        Err(Error::RoleNotFound {
            role: RowRole::ValueType
        })
    ));
}

#[tokio::test]
async fn test_no_files_yields_empty_result() {
    let outcome = dispatcher(ConversionMode::Records)
        .dispatch(Vec::new(), DispatchStrategy::Sequential)
        .await
        .unwrap();

    assert!(outcome.result.is_empty());
    assert_eq!(outcome.stats.files_converted, 0);
}
