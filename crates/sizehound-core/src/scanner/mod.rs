/// Scanner module: orchestrates the scan pipeline.
///
/// One scan is one producer plus a fixed pool of consumers:
///
/// - **Walker** ([`walker`]): explicit-stack traversal, writes descriptors
///   into a bounded crossbeam channel (the backpressure point).
/// - **Workers** ([`consumer`]): drain the channel, feed the shared
///   [`TopItemsTracker`](crate::analysis::TopItemsTracker) and the
///   per-directory [`FolderTotals`](crate::analysis::FolderTotals).
/// - **Orchestrator** ([`run_scan`]): validates options, runs the pipeline
///   inside a thread scope, joins walker then workers, ranks folders and
///   assembles the [`ScanResult`].
///
/// [`start_scan`] runs the same thing on a background thread and hands back
/// a [`ScanHandle`] for progress, cancellation and the final result.
pub mod consumer;
pub mod filters;
pub mod options;
pub mod pipeline;
pub mod progress;
pub mod result;
pub mod walker;

pub use filters::ExclusionRules;
pub use options::ScanOptions;
pub use pipeline::DISPATCH_CHANNEL_CAPACITY;
pub use progress::{ProgressSink, ScanProgress};
pub use result::{ScanOutcome, ScanResult, ScanState};

use crate::analysis::{analyse_file_types, TopItemsTracker};
use crate::error::ScanError;
use crate::model::FileRecord;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use pipeline::Pipeline;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Maximum number of progress snapshots that may queue up for a
/// [`ScanHandle`] observer. Further snapshots are dropped, never blocked on.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 1_024;

/// Cooperative cancellation flag shared by everything in one scan.
///
/// Cloning shares the flag. `cancel` is idempotent and safe to call from any
/// thread, at any time, including after the scan finished.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Run a scan on the calling thread and return its result.
///
/// Returns `Err` only when the options fail validation, before any work
/// starts. Cancellation and failures after that point come back as a
/// `ScanResult` with the matching [`ScanOutcome`].
pub fn run_scan(
    options: &ScanOptions,
    cancel: &CancelToken,
    sink: Option<&dyn ProgressSink>,
) -> Result<ScanResult, ScanError> {
    let root = options.validate()?;
    let rules = ExclusionRules::new(&options.excluded_names, &options.exclude_patterns)?;
    let top_files = TopItemsTracker::new(options.max_results, |a: &FileRecord, b: &FileRecord| {
        b.size.cmp(&a.size)
    })?;

    let pipeline = Pipeline::new(root, options, rules, top_files, cancel.clone(), sink);
    info!(
        "Scanning {} with {} workers",
        pipeline.root.display(),
        options.effective_workers()
    );

    let failure = execute(&pipeline).err();
    Ok(finish(pipeline, failure))
}

/// Start the walker and the worker pool and wait for all of them.
///
/// Joins the walker first, then every worker. The first error wins.
fn execute(pipeline: &Pipeline<'_>) -> Result<(), ScanError> {
    let workers = pipeline.options.effective_workers();
    let (tx, rx) = crossbeam_channel::bounded(DISPATCH_CHANNEL_CAPACITY);

    thread::scope(|scope| {
        let mut failure: Option<ScanError> = None;

        let mut consumers = Vec::with_capacity(workers);
        for worker in 0..workers {
            let rx = rx.clone();
            let spawned = thread::Builder::new()
                .name(format!("sizehound-worker-{worker}"))
                .spawn_scoped(scope, move || consumer::run(pipeline, rx, worker));
            match spawned {
                Ok(handle) => consumers.push(handle),
                Err(source) => {
                    pipeline.abort();
                    failure = Some(ScanError::Spawn { source });
                    break;
                }
            }
        }
        drop(rx);

        let walker = if failure.is_none() {
            let spawned = thread::Builder::new()
                .name("sizehound-walker".into())
                .spawn_scoped(scope, move || walker::run(pipeline, tx));
            match spawned {
                Ok(handle) => Some(handle),
                Err(source) => {
                    pipeline.abort();
                    failure = Some(ScanError::Spawn { source });
                    None
                }
            }
        } else {
            drop(tx);
            None
        };

        if let Some(handle) = walker {
            if let Err(payload) = handle.join() {
                let err = ScanError::from_panic(payload);
                warn!("{err}");
                failure.get_or_insert(err);
            }
        }
        debug!("walker joined, waiting for {} workers", consumers.len());

        for handle in consumers {
            let err = match handle.join() {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => err,
                Err(payload) => ScanError::from_panic(payload),
            };
            warn!("{err}");
            pipeline.abort();
            failure.get_or_insert(err);
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    })
}

/// Rank folders, classify files, stamp the elapsed time and build the result.
fn finish(pipeline: Pipeline<'_>, failure: Option<ScanError>) -> ScanResult {
    let mut outcome = match failure {
        Some(err) => ScanOutcome::Failed(err.to_string()),
        None if pipeline.is_cancelled() => ScanOutcome::Cancelled,
        None => ScanOutcome::Completed,
    };

    let max_results = pipeline.options.max_results;
    let top_folders = pipeline.folders.top_folders(max_results);
    let top_files = match pipeline.top_files.into_sorted_vec() {
        Ok(files) => files,
        Err(err) => {
            outcome = ScanOutcome::Failed(err.to_string());
            Vec::new()
        }
    };
    let file_types = if pipeline.options.folders_only {
        Vec::new()
    } else {
        analyse_file_types(&top_files)
    };

    let progress = pipeline.counters.snapshot_at(pipeline.counters.elapsed());
    if let Some(sink) = pipeline.sink {
        sink.report(&progress);
    }

    info!(
        "Scan of {} ended ({:?}): {} files, {} folders, {} bytes in {:?}",
        pipeline.root.display(),
        outcome,
        progress.files_scanned,
        progress.folders_scanned,
        progress.bytes_processed,
        progress.elapsed
    );

    ScanResult {
        root: pipeline.root,
        top_files,
        top_folders,
        file_types,
        progress,
        outcome,
    }
}

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    /// Throttled progress snapshots from the scan.
    pub progress_rx: Receiver<ScanProgress>,
    root: PathBuf,
    cancel: CancelToken,
    state: Arc<Mutex<ScanState>>,
    thread: Option<thread::JoinHandle<ScanResult>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ScanState {
        *self.state.lock()
    }

    /// `true` once the scan thread has returned; [`ScanHandle::join`] will
    /// not block.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Wait for the scan to end and take its result.
    pub fn join(mut self) -> ScanResult {
        let root = std::mem::take(&mut self.root);
        match self.thread.take().map(|t| t.join()) {
            Some(Ok(result)) => result,
            Some(Err(payload)) => {
                *self.state.lock() = ScanState::Failed;
                ScanResult::failed(root, ScanError::from_panic(payload).to_string())
            }
            None => ScanResult::failed(root, "scan result already taken"),
        }
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        // An abandoned scan has no reader; let it wind down.
        if self.thread.is_some() {
            self.cancel.cancel();
        }
    }
}

/// Validate `options` and start scanning on a background thread.
///
/// Invalid options are rejected here, before any thread is spawned.
pub fn start_scan(options: ScanOptions) -> Result<ScanHandle, ScanError> {
    options.validate()?;
    ExclusionRules::new(&options.excluded_names, &options.exclude_patterns)?;

    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel = CancelToken::new();
    let cancel_clone = cancel.clone();
    let state = Arc::new(Mutex::new(ScanState::Running));
    let state_clone = Arc::clone(&state);
    let root = options.root.clone();

    let thread = thread::Builder::new()
        .name("sizehound-scanner".into())
        .spawn(move || {
            let forward = move |progress: &ScanProgress| {
                let _ = progress_tx.try_send(progress.clone());
            };
            let sink: &dyn ProgressSink = &forward;
            let result = match run_scan(&options, &cancel_clone, Some(sink)) {
                Ok(result) => result,
                // The root changed between validation and start.
                Err(err) => ScanResult::failed(options.root.clone(), err.to_string()),
            };
            *state_clone.lock() = result.state();
            result
        })
        .map_err(|source| ScanError::Spawn { source })?;

    Ok(ScanHandle {
        progress_rx,
        root,
        cancel,
        state,
        thread: Some(thread),
    })
}
