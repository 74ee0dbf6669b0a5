//! Worker pool for concurrent conversion
//!
//! A fixed number of worker tasks drain a shared, pre-filled queue of file
//! paths. Each conversion runs on the blocking thread pool and its result
//! is pushed onto a channel sized to hold every report, so no worker ever
//! waits on the coordinator. The coordinator joins all workers before it
//! reads a single report.
//!
//! A non-recoverable conversion error raises a shared stop flag. Workers
//! check it before taking the next file, so a fatal error ends the run
//! once the conversions already in flight finish.

use crate::app::models::{AggregateResult, ConversionMode};
use crate::app::services::file_converter::FileConverter;
use crate::{Error, Result};
use indicatif::ProgressBar;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};
use tokio::task::{self, JoinSet};
use tracing::{debug, error, info, warn};

/// Shared queue of files still to convert
type WorkQueue = Arc<Mutex<VecDeque<PathBuf>>>;

/// Conversion result for one file, owned by whoever holds the report
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub converted: Result<AggregateResult>,
    pub worker_id: usize,
}

/// Run `workers` tasks over `files` and return every file's report
///
/// Reports come back in completion order. Fails only if a worker task
/// itself dies; conversion errors travel inside the reports.
pub async fn run_pool(
    converter: FileConverter,
    mode: ConversionMode,
    files: Vec<PathBuf>,
    workers: usize,
    progress: Option<ProgressBar>,
) -> Result<Vec<FileReport>> {
    let file_count = files.len();
    let (sender, mut receiver) = mpsc::channel(file_count.max(1));
    let queue: WorkQueue = Arc::new(Mutex::new(files.into_iter().collect()));
    let stop = Arc::new(AtomicBool::new(false));

    info!("Spawning {} conversion workers for {} files", workers, file_count);

    let mut pool = JoinSet::new();
    for worker_id in 0..workers {
        pool.spawn(worker_task(
            worker_id,
            queue.clone(),
            stop.clone(),
            converter.clone(),
            mode,
            sender.clone(),
            progress.clone(),
        ));
    }
    // Workers hold the only remaining senders
    drop(sender);

    // Completion barrier
    while let Some(joined) = pool.join_next().await {
        match joined {
            Ok(Ok(handled)) => debug!("Worker finished after {} files", handled),
            Ok(Err(e)) => {
                error!("Worker failed: {}", e);
                return Err(e);
            }
            Err(e) => {
                error!("Worker task panicked: {}", e);
                return Err(Error::worker_failed(format!("worker task failed: {e}")));
            }
        }
    }

    let mut reports = Vec::with_capacity(file_count);
    while let Some(report) = receiver.recv().await {
        reports.push(report);
    }

    Ok(reports)
}

/// Worker task that converts files from the shared queue until it is empty
async fn worker_task(
    worker_id: usize,
    queue: WorkQueue,
    stop: Arc<AtomicBool>,
    converter: FileConverter,
    mode: ConversionMode,
    sender: mpsc::Sender<FileReport>,
    progress: Option<ProgressBar>,
) -> Result<usize> {
    let mut handled = 0;
    debug!("Worker {} started", worker_id);

    loop {
        if stop.load(Ordering::Acquire) {
            debug!("Worker {} stopping after a fatal error", worker_id);
            break;
        }

        let path = {
            let mut queue = queue.lock().await;
            match queue.pop_front() {
                Some(path) => path,
                None => break,
            }
        };

        debug!("Worker {} converting {}", worker_id, path.display());

        let job_converter = converter.clone();
        let job_path = path.clone();
        let converted = task::spawn_blocking(move || job_converter.convert_file(&job_path, mode))
            .await
            .map_err(|e| {
                Error::worker_failed(format!(
                    "worker {} lost conversion of {}: {}",
                    worker_id,
                    path.display(),
                    e
                ))
            })?;

        handled += 1;
        if converted.as_ref().is_err_and(|e| !e.is_recoverable()) {
            warn!(
                "Worker {} hit a fatal error on {}; stopping the pool",
                worker_id,
                path.display()
            );
            stop.store(true, Ordering::Release);
        }
        if let Some(pb) = &progress {
            pb.inc(1);
        }

        let report = FileReport {
            path,
            converted,
            worker_id,
        };
        if sender.send(report).await.is_err() {
            return Err(Error::worker_failed(format!(
                "worker {} lost the results channel",
                worker_id
            )));
        }
    }

    debug!("Worker {} completed {} files", worker_id, handled);
    Ok(handled)
}
