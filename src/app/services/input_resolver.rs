//! Input resolution
//!
//! Expands the files and directories given on the command line into a
//! flat list of workbook paths, filtered by the configured extensions.
//! Directories are walked recursively in file name order. Symlinked files
//! inside a walked directory are included when their target is a file.

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Resolves input paths into workbook files
#[derive(Debug, Clone)]
pub struct InputResolver {
    extensions: Vec<String>,
}

impl InputResolver {
    /// Create a resolver for the given extensions (with or without a leading dot)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Check if a path has one of the workbook extensions
    pub fn is_workbook_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }

    /// Expand every input into workbook file paths
    ///
    /// A regular file is kept when its extension matches; a directory
    /// contributes every matching file beneath it. An input that cannot be
    /// read, or is neither a file nor a directory, aborts resolution.
    pub fn resolve(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in inputs {
            let metadata = fs::metadata(input)
                .map_err(|e| Error::invalid_input_path(input.clone(), Some(e)))?;

            if metadata.is_dir() {
                let found = self.walk_directory(input)?;
                debug!(
                    "Found {} workbook files under {}",
                    found.len(),
                    input.display()
                );
                files.extend(found);
            } else if metadata.is_file() {
                if self.is_workbook_file(input) {
                    files.push(input.clone());
                } else {
                    debug!("Ignoring non-workbook file: {}", input.display());
                }
            } else {
                return Err(Error::invalid_input_path(input.clone(), None));
            }
        }

        info!(
            "Resolved {} inputs into {} workbook files",
            inputs.len(),
            files.len()
        );
        Ok(files)
    }

    /// Recursively collect matching files under a directory, in file name order
    fn walk_directory(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(format!("Failed to walk {}", dir.display()), e)
            })?;
            if entry.path().is_file() && self.is_workbook_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}
