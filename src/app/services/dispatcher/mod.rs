//! Multi-file dispatch and merge
//!
//! Runs the [`FileConverter`] over a resolved file list and folds the
//! per-file results into one [`AggregateResult`].
//!
//! # Strategies
//!
//! - [`DispatchStrategy::Sequential`] converts files one after another and
//!   merges each as it completes.
//! - [`DispatchStrategy::Concurrent`] hands the list to a fixed pool of
//!   workers pulling from a shared queue (see [`worker`]). The coordinator
//!   waits for every worker, then drains the results channel and merges
//!   on its own, so the aggregate only ever has a single writer.
//!
//! Merging is last-write-wins on sheet name. Under the concurrent strategy
//! "last" follows worker completion order, so when two files define a
//! sheet of the same name the two strategies may keep different sheets.
//!
//! # Failure Tiers
//!
//! A workbook that cannot be read is logged, counted as skipped and
//! contributes nothing. Any other error aborts the dispatch; under the
//! concurrent strategy workers stop taking files as soon as one reports it.

pub mod worker;

#[cfg(test)]
mod tests;

use crate::app::models::{AggregateResult, ConversionMode};
use crate::app::services::file_converter::FileConverter;
use crate::constants::AUTO_WORKERS;
use crate::{Error, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, info, warn};

/// How files are scheduled for conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchStrategy {
    /// One file at a time, in resolved order
    Sequential,
    /// Fixed worker pool sized to the available CPUs
    #[default]
    Concurrent,
}

/// Counters collected while dispatching
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Files converted and merged
    pub files_converted: usize,
    /// Files skipped because they could not be read
    pub skipped_files: Vec<PathBuf>,
    /// Workers that took part (1 for sequential dispatch)
    pub workers_used: usize,
}

impl DispatchStats {
    pub fn files_skipped(&self) -> usize {
        self.skipped_files.len()
    }
}

/// Merged result plus statistics
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    pub result: AggregateResult,
    pub stats: DispatchStats,
}

impl DispatchOutcome {
    /// Fold one file's conversion into the outcome
    ///
    /// Recoverable failures are logged and recorded as skipped; any other
    /// failure is returned to abort the run.
    fn absorb(&mut self, path: &Path, converted: Result<AggregateResult>) -> Result<()> {
        match converted {
            Ok(fragment) => {
                debug!(
                    "Merging {} sheets from {}",
                    fragment.len(),
                    path.display()
                );
                self.result.merge(fragment);
                self.stats.files_converted += 1;
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                warn!("Skipping unreadable workbook {}: {}", path.display(), e);
                self.stats.skipped_files.push(path.to_path_buf());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Schedules file conversions and merges their results
#[derive(Debug, Clone)]
pub struct Dispatcher {
    converter: FileConverter,
    mode: ConversionMode,
    workers: usize,
    progress: Option<ProgressBar>,
}

impl Dispatcher {
    /// Create a dispatcher with one worker per available CPU
    pub fn new(converter: FileConverter, mode: ConversionMode) -> Self {
        Self {
            converter,
            mode,
            workers: AUTO_WORKERS,
            progress: None,
        }
    }

    /// Set the worker pool size (0 = one per available CPU)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Report per-file progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Effective pool size for concurrent dispatch
    pub fn worker_count(&self) -> usize {
        if self.workers == AUTO_WORKERS {
            num_cpus::get()
        } else {
            self.workers
        }
    }

    /// Convert and merge `files` using the given strategy
    pub async fn dispatch(
        &self,
        files: Vec<PathBuf>,
        strategy: DispatchStrategy,
    ) -> Result<DispatchOutcome> {
        info!(
            "Dispatching {} files ({:?}, {:?} mode)",
            files.len(),
            strategy,
            self.mode
        );

        match strategy {
            DispatchStrategy::Sequential => {
                let dispatcher = self.clone();
                task::spawn_blocking(move || dispatcher.dispatch_sequential(&files))
                    .await
                    .map_err(|e| Error::worker_failed(format!("sequential dispatch failed: {e}")))?
            }
            DispatchStrategy::Concurrent => self.dispatch_concurrent(files).await,
        }
    }

    /// Convert files one at a time, merging after each
    pub fn dispatch_sequential(&self, files: &[PathBuf]) -> Result<DispatchOutcome> {
        let mut outcome = DispatchOutcome::default();
        outcome.stats.workers_used = 1;

        for path in files {
            debug!("Converting {}", path.display());
            let converted = self.converter.convert_file(path, self.mode);
            outcome.absorb(path, converted)?;
            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
        }

        Ok(outcome)
    }

    /// Convert files on the worker pool, then merge on this task
    pub async fn dispatch_concurrent(&self, files: Vec<PathBuf>) -> Result<DispatchOutcome> {
        let mut outcome = DispatchOutcome::default();
        if files.is_empty() {
            return Ok(outcome);
        }

        let workers = self.worker_count().clamp(1, files.len());
        outcome.stats.workers_used = workers;

        let reports = worker::run_pool(
            self.converter.clone(),
            self.mode,
            files,
            workers,
            self.progress.clone(),
        )
        .await?;

        for report in reports {
            debug!(
                "Report for {} from worker {}",
                report.path.display(),
                report.worker_id
            );
            outcome.absorb(&report.path, report.converted)?;
        }

        Ok(outcome)
    }
}
