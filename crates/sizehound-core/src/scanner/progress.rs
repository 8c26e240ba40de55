/// Scan progress reporting.
///
/// Live counters are [`ProgressCounters`]: plain atomics that the walker and
/// the workers bump without taking any lock. Observers never see the live
/// counters; they receive immutable [`ScanProgress`] snapshots through a
/// [`ProgressSink`], throttled to one push per [`PROGRESS_EVERY`] entries
/// plus a final push when the scan ends.
use parking_lot::Mutex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Entries (files + folders) between two progress pushes.
pub const PROGRESS_EVERY: u64 = 100;

/// Immutable progress snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanProgress {
    pub files_scanned: u64,
    pub folders_scanned: u64,
    pub bytes_processed: u64,
    /// Most recent directory the walker entered.
    pub current_path: PathBuf,
    pub elapsed: Duration,
    /// Only available when the caller supplied an expected total.
    pub eta: Option<Duration>,
}

impl ScanProgress {
    /// Files + folders.
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.folders_scanned
    }

    /// Processing rate in bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes_processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Receives progress snapshots. Called from scan threads, so it must be cheap
/// and must not block for long.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &ScanProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(&ScanProgress) + Send + Sync,
{
    fn report(&self, progress: &ScanProgress) {
        self(progress)
    }
}

/// Shared live counters for one scan.
#[derive(Debug)]
pub struct ProgressCounters {
    started: Instant,
    files_scanned: AtomicU64,
    folders_scanned: AtomicU64,
    bytes_processed: AtomicU64,
    current_path: Mutex<PathBuf>,
    estimated_total_bytes: Option<u64>,
}

impl ProgressCounters {
    pub fn new(estimated_total_bytes: Option<u64>) -> Self {
        Self {
            started: Instant::now(),
            files_scanned: AtomicU64::new(0),
            folders_scanned: AtomicU64::new(0),
            bytes_processed: AtomicU64::new(0),
            current_path: Mutex::new(PathBuf::new()),
            estimated_total_bytes,
        }
    }

    /// Count one file; returns the new total of files + folders.
    #[inline]
    pub fn record_file(&self) -> u64 {
        let files = self.files_scanned.fetch_add(1, Ordering::Relaxed) + 1;
        files + self.folders_scanned.load(Ordering::Relaxed)
    }

    /// Count one folder; returns the new total of files + folders.
    #[inline]
    pub fn record_folder(&self) -> u64 {
        let folders = self.folders_scanned.fetch_add(1, Ordering::Relaxed) + 1;
        folders + self.files_scanned.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_bytes(&self, bytes: u64) {
        self.bytes_processed.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn set_current_path(&self, path: &Path) {
        let mut current = self.current_path.lock();
        current.clear();
        current.push(path);
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Copy the counters into an immutable snapshot.
    pub fn snapshot(&self) -> ScanProgress {
        self.snapshot_at(self.started.elapsed())
    }

    /// Snapshot with an explicit elapsed time (used for the final stamp).
    pub fn snapshot_at(&self, elapsed: Duration) -> ScanProgress {
        let bytes_processed = self.bytes_processed.load(Ordering::Relaxed);
        ScanProgress {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            folders_scanned: self.folders_scanned.load(Ordering::Relaxed),
            bytes_processed,
            current_path: self.current_path.lock().clone(),
            elapsed,
            eta: estimate_remaining(elapsed, bytes_processed, self.estimated_total_bytes),
        }
    }
}

/// Linear extrapolation of the time left, given an expected byte total.
fn estimate_remaining(elapsed: Duration, processed: u64, expected: Option<u64>) -> Option<Duration> {
    let expected = expected?;
    if processed == 0 || processed >= expected {
        return None;
    }
    let remaining = (expected - processed) as f64 / processed as f64;
    Some(elapsed.mul_f64(remaining))
}
