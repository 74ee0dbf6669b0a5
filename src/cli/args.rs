//! Command-line argument definitions for xlsx-json
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::models::ConversionMode;
use crate::app::services::dispatcher::DispatchStrategy;
use crate::app::services::json_writer::OutputTarget;
use crate::constants::MAX_WORKERS;
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the workbook to JSON converter
///
/// Converts one or more spreadsheet workbooks into a JSON document keyed
/// by sheet name, using a row-format schema to tell key, value-type and
/// comment rows apart from data rows.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "xlsx-json",
    version,
    about = "Convert spreadsheet workbooks into structured JSON",
    long_about = "Converts xlsx (and other spreadsheet) workbooks into a single JSON document keyed \
                  by sheet name. A configurable row-format schema marks which rows hold column keys, \
                  value types and comments; every other row becomes a record. Files and directories \
                  can be mixed freely and are converted on a worker pool."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Convert xlsx files or directories into JSON file(s)
    Convert(ConvertArgs),
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Input workbook files or directories containing workbooks
    ///
    /// May be given several times or as a comma-separated list. Directories
    /// are searched recursively for files with a configured extension.
    #[arg(
        short = 'f',
        long = "from",
        value_name = "PATH",
        required = true,
        num_args = 1..,
        value_delimiter = ',',
        help = "Input xlsx files or directories (repeatable)"
    )]
    pub from: Vec<PathBuf>,

    /// Output JSON file, or a directory with --multiple-output
    #[arg(
        short = 't',
        long = "to",
        value_name = "PATH",
        help = "Output JSON file (or directory with --multiple-output)"
    )]
    pub to: PathBuf,

    /// Emit column names, indexes and value types instead of records
    #[arg(long = "only-header", help = "Only output column header information")]
    pub only_header: bool,

    /// Write one JSON file per sheet into the --to directory
    #[arg(long = "multiple-output", help = "Output one JSON file per sheet")]
    pub multiple_output: bool,

    /// Convert files one at a time instead of on the worker pool
    #[arg(long = "sequential", help = "Convert files sequentially")]
    pub sequential: bool,

    /// Number of parallel workers
    ///
    /// Defaults to the configured value, which in turn defaults to one
    /// worker per available CPU.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel workers for conversion"
    )]
    pub workers: Option<usize>,

    /// Indent the JSON output
    #[arg(long = "pretty", help = "Pretty-print the JSON output")]
    pub pretty: bool,

    /// Path to configuration file
    ///
    /// TOML configuration file with the row format and extensions. If not
    /// specified, looks for <config dir>/xlsx-json/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<&Commands> {
        self.command.as_ref()
    }
}

impl ConvertArgs {
    /// Validate argument combinations
    pub fn validate(&self) -> Result<()> {
        if self.from.is_empty() {
            return Err(Error::configuration(
                "At least one --from path is required".to_string(),
            ));
        }

        if self.to.as_os_str().is_empty() {
            return Err(Error::configuration("--to path cannot be empty".to_string()));
        }

        if self.multiple_output && self.to.is_file() {
            return Err(Error::configuration(format!(
                "--multiple-output requires a directory, but {} is a file",
                self.to.display()
            )));
        }

        if !self.multiple_output && self.to.is_dir() {
            return Err(Error::configuration(format!(
                "Output path {} is a directory; use --multiple-output to write one file per sheet",
                self.to.display()
            )));
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "Number of workers must be greater than 0".to_string(),
                ));
            }
            if workers > MAX_WORKERS {
                return Err(Error::configuration(format!(
                    "Number of workers cannot exceed {}",
                    MAX_WORKERS
                )));
            }
        }

        Ok(())
    }

    /// Conversion mode selected by --only-header
    pub fn mode(&self) -> ConversionMode {
        if self.only_header {
            ConversionMode::Header
        } else {
            ConversionMode::Records
        }
    }

    /// Dispatch strategy, with --sequential overriding the configured default
    pub fn strategy(&self, configured_sequential: bool) -> DispatchStrategy {
        if self.sequential || configured_sequential {
            DispatchStrategy::Sequential
        } else {
            DispatchStrategy::Concurrent
        }
    }

    /// Where the JSON output is written
    pub fn output_target(&self) -> OutputTarget {
        if self.multiple_output {
            OutputTarget::PerSheet(self.to.clone())
        } else {
            OutputTarget::File(self.to.clone())
        }
    }

    /// Get log level based on verbosity
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Whether to show progress bars
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}
