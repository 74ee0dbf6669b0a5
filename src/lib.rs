//! xlsx-json Library
//!
//! A Rust library for converting spreadsheet workbooks into structured JSON,
//! driven by a row-format schema that assigns a semantic role (key row,
//! value-type row, comment row, data row) to row positions in every sheet.
//!
//! This library provides tools for:
//! - Validating row-format schemas and answering role/position lookups
//! - Converting sheets into records (data mode) or column metadata (header mode)
//! - Resolving input files and directories into workbook paths
//! - Dispatching conversions sequentially or across a worker pool
//! - Merging per-file results and writing them out as JSON

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod dispatcher;
        pub mod file_converter;
        pub mod input_resolver;
        pub mod json_writer;
        pub mod row_format;
        pub mod sheet_converter;
        pub mod workbook;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    AggregateResult, ColumnInfo, ConversionMode, Record, RowFormatEntry, RowRole, Sheet,
    SheetResult,
};
pub use app::services::row_format::RowFormatSchema;
pub use config::Config;

use std::path::PathBuf;

/// Result type alias for xlsx-json operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for schema loading, conversion and output
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration file '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Row-format schema is structurally inconsistent
    #[error("Invalid row format schema: {message}")]
    Schema { message: String },

    /// Schema has no row carrying the requested role
    #[error("Row format schema has no row with role '{role}'")]
    RoleNotFound { role: RowRole },

    /// Input path is neither a readable file nor a directory
    #[error("Invalid input path: {path}")]
    InvalidInputPath {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Workbook could not be opened or parsed
    #[error("Failed to read workbook '{path}': {message}")]
    Workbook { path: PathBuf, message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two sheets would be written to the same per-sheet output file
    #[error("Sheets '{first}' and '{second}' both map to output file '{path}'")]
    OutputCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// A dispatch worker stopped without reporting its result
    #[error("Worker failed: {message}")]
    WorkerFailed { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a schema validation error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a role lookup error
    pub fn role_not_found(role: RowRole) -> Self {
        Self::RoleNotFound { role }
    }

    /// Create an invalid input path error
    pub fn invalid_input_path(path: impl Into<PathBuf>, source: Option<std::io::Error>) -> Self {
        Self::InvalidInputPath {
            path: path.into(),
            source,
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a workbook read error
    pub fn workbook(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Workbook {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a JSON serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a worker failure error
    pub fn worker_failed(message: impl Into<String>) -> Self {
        Self::WorkerFailed {
            message: message.into(),
        }
    }

    /// Whether the run may continue after this error.
    ///
    /// Only a single unreadable workbook is recoverable; it is logged and
    /// skipped at file granularity. Everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Workbook { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}
