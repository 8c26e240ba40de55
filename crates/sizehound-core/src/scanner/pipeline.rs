/// State shared by the walker and the worker pool for one scan.
///
/// Everything in here is either immutable for the scan's lifetime or
/// internally synchronised, so the walker and workers borrow one
/// `&Pipeline` from inside a `std::thread::scope`.
use crate::analysis::{FolderTotals, TopItemsTracker};
use crate::model::FileRecord;
use crate::scanner::filters::ExclusionRules;
use crate::scanner::options::ScanOptions;
use crate::scanner::progress::{ProgressCounters, ProgressSink};
use crate::scanner::CancelToken;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Slots in the walker → worker dispatch channel.
///
/// When the channel is full the walker blocks, so at most this many
/// discovered-but-unprocessed entries are ever held in memory.
pub const DISPATCH_CHANNEL_CAPACITY: usize = 1_000;

/// How long a blocked channel send or receive waits before re-checking
/// for cancellation.
pub(crate) const CHANNEL_POLL: Duration = Duration::from_millis(25);

pub(crate) struct Pipeline<'s> {
    /// Canonical scan root.
    pub root: PathBuf,
    pub options: &'s ScanOptions,
    pub rules: ExclusionRules,
    pub counters: ProgressCounters,
    pub top_files: TopItemsTracker<FileRecord>,
    pub folders: FolderTotals,
    pub sink: Option<&'s dyn ProgressSink>,
    cancel: CancelToken,
    /// Set when a pipeline thread fails, so the others wind down.
    abort: AtomicBool,
}

impl<'s> Pipeline<'s> {
    pub fn new(
        root: PathBuf,
        options: &'s ScanOptions,
        rules: ExclusionRules,
        top_files: TopItemsTracker<FileRecord>,
        cancel: CancelToken,
        sink: Option<&'s dyn ProgressSink>,
    ) -> Self {
        Self {
            folders: FolderTotals::new(&root),
            counters: ProgressCounters::new(options.estimated_total_bytes),
            root,
            options,
            rules,
            top_files,
            sink,
            cancel,
            abort: AtomicBool::new(false),
        }
    }

    /// `true` once the scan was cancelled or a pipeline thread failed.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.abort.load(Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    /// Push a progress snapshot to the observer, if any.
    pub fn report_progress(&self) {
        if let Some(sink) = self.sink {
            sink.report(&self.counters.snapshot());
        }
    }

    /// Guard that aborts the pipeline if the owning thread unwinds.
    pub fn abort_on_panic(&self) -> AbortOnPanic<'_> {
        AbortOnPanic(&self.abort)
    }
}

pub(crate) struct AbortOnPanic<'a>(&'a AtomicBool);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(true, Ordering::Relaxed);
        }
    }
}
