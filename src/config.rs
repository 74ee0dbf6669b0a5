//! Configuration management and validation.
//!
//! Provides the configuration consumed by the converter: the row-format
//! schema, the recognised workbook extensions, worker pool sizing and
//! output formatting. Configuration is layered: built-in defaults, then an
//! optional TOML file, then command-line overrides.
//!
//! ```toml
//! extensions = ["xlsx"]
//!
//! [[rows]]
//! position = 1
//! role = "key"
//!
//! [[rows]]
//! position = 2
//! role = "value-type"
//!
//! [performance]
//! workers = 0
//! ```

use crate::app::models::RowFormatEntry;
use crate::app::services::row_format::RowFormatSchema;
use crate::constants::{
    AUTO_WORKERS, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_WORKBOOK_EXTENSIONS, MAX_WORKERS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerformanceConfig {
    /// Number of concurrent conversion workers (0 = one per available CPU)
    pub workers: usize,

    /// Convert files one at a time instead of on the worker pool
    pub sequential: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            workers: AUTO_WORKERS,
            sequential: false,
        }
    }
}

/// Output formatting configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Indent JSON output
    pub pretty: bool,
}

/// Global configuration for workbook conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Explicit row-format entries; `None` selects the built-in schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<RowFormatEntry>>,

    /// Workbook file extensions, with or without the leading dot
    pub extensions: Vec<String>,

    /// Worker pool settings
    pub performance: PerformanceConfig,

    /// Output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: None,
            extensions: DEFAULT_WORKBOOK_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            performance: PerformanceConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Default config file location under the user config directory
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            Error::configuration("Could not determine user configuration directory")
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| Error::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load and validate a configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        let config = Self::from_toml_str(&content, path)?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Defaults overlaid with a config file, if one is given or found
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used only when a file is present there.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => {
                info!("Using config file: {}", path.display());
                Self::load_from_file(path)
            }
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => {
                    info!("Using config file: {}", path.display());
                    Self::load_from_file(&path)
                }
                _ => {
                    info!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Check the configuration before any conversion runs
    pub fn validate(&self) -> Result<()> {
        if let Some(entries) = &self.rows {
            RowFormatSchema::validate(entries)?;
        }

        if self.extensions.iter().all(|ext| ext.trim().trim_start_matches('.').is_empty()) {
            return Err(Error::configuration(
                "At least one workbook extension must be configured",
            ));
        }

        if self.performance.workers > MAX_WORKERS {
            return Err(Error::configuration(format!(
                "Number of workers cannot exceed {}",
                MAX_WORKERS
            )));
        }

        Ok(())
    }

    /// Build the row-format schema this configuration describes
    pub fn schema(&self) -> Result<RowFormatSchema> {
        match &self.rows {
            Some(entries) => RowFormatSchema::new(entries.clone()),
            None => Ok(RowFormatSchema::default()),
        }
    }

    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.performance.workers = workers;
        self
    }

    /// Create configuration with explicit row-format entries
    pub fn with_rows(mut self, rows: Vec<RowFormatEntry>) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Create configuration with custom workbook extensions
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }
}
