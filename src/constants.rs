//! Application constants for xlsx-json
//!
//! This module contains default values and fixed names used throughout
//! the converter.

// =============================================================================
// Row Format Defaults
// =============================================================================

/// Row position of the key row in the built-in schema
pub const DEFAULT_KEY_ROW: usize = 1;

/// Row position of the value-type row in the built-in schema
pub const DEFAULT_VALUE_TYPE_ROW: usize = 2;

/// Row position of the comment row in the built-in schema
pub const DEFAULT_COMMENT_ROW: usize = 3;

/// Row position the data-mode header (column names) is always read from
pub const HEADER_ROW: usize = 1;

// =============================================================================
// Input Discovery
// =============================================================================

/// Workbook extensions recognised when no configuration overrides them
pub const DEFAULT_WORKBOOK_EXTENSIONS: &[&str] = &["xlsx"];

// =============================================================================
// Configuration
// =============================================================================

/// Directory name under the user config dir
pub const CONFIG_DIR_NAME: &str = "xlsx-json";

/// Config file name looked up when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Worker count meaning "one per available CPU"
pub const AUTO_WORKERS: usize = 0;

/// Upper bound on explicitly configured workers
pub const MAX_WORKERS: usize = 256;

// =============================================================================
// Output
// =============================================================================

/// File extension for per-sheet output files
pub const JSON_EXTENSION: &str = "json";

/// Minimum file count before a progress bar is shown
pub const PROGRESS_BAR_MIN_FILES: usize = 2;
