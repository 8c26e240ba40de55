/// Recursive folder totals.
///
/// Every file a worker processes adds its size to each ancestor directory
/// up to and including the scan root. Totals are kept per directory in a
/// [`FolderAccumulator`] (two `AtomicU64`s, no lock), stored in a `DashMap`
/// keyed by the normalised directory path. Only the first touch of a
/// directory takes a shard write lock; every later update is a read-lock
/// lookup plus two atomic adds.
///
/// Once all workers have joined, [`FolderTotals::top_folders`] resolves each
/// directory on disk, ranks by size and caps the list.
use crate::model::{display_name, FolderRecord};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Whether directory keys fold case. Matches the default behaviour of the
/// platform's native file system.
const CASE_INSENSITIVE_PATHS: bool = cfg!(any(windows, target_os = "macos"));

/// Running byte total and item count for one directory.
///
/// The two counters are updated independently; they are only guaranteed to
/// agree once every writer has finished.
#[derive(Debug)]
pub struct FolderAccumulator {
    path: PathBuf,
    total_size: AtomicU64,
    item_count: AtomicU64,
}

impl FolderAccumulator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            total_size: AtomicU64::new(0),
            item_count: AtomicU64::new(0),
        }
    }

    /// Count one file of `size` bytes.
    #[inline]
    pub fn add(&self, size: u64) {
        self.total_size.fetch_add(size, Ordering::Relaxed);
        self.item_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn total_size(&self) -> u64 {
        self.total_size.load(Ordering::Relaxed)
    }

    pub fn item_count(&self) -> u64 {
        self.item_count.load(Ordering::Relaxed)
    }
}

/// Normalised map key for a directory path.
///
/// Separators are unified to `/`, trailing separators dropped, and case is
/// folded on case-insensitive platforms.
pub fn path_key(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut key = if cfg!(windows) {
        raw.replace('\\', "/")
    } else {
        raw.into_owned()
    };
    while key.len() > 1 && key.ends_with('/') && !key.ends_with(":/") {
        key.pop();
    }
    if CASE_INSENSITIVE_PATHS {
        key = key.to_lowercase();
    }
    key
}

/// Concurrent map of folder accumulators for one scan root.
#[derive(Debug)]
pub struct FolderTotals {
    root_key: String,
    /// `root_key` followed by a separator, for descendant checks.
    root_prefix: String,
    folders: DashMap<String, FolderAccumulator>,
}

impl FolderTotals {
    /// Create an empty map for scans rooted at `root`.
    pub fn new(root: &Path) -> Self {
        let root_key = path_key(root);
        let root_prefix = if root_key.ends_with('/') {
            root_key.clone()
        } else {
            format!("{root_key}/")
        };
        Self {
            root_key,
            root_prefix,
            folders: DashMap::with_capacity(4_096),
        }
    }

    /// Add `size` to every directory from the parent of `file_path` up to
    /// and including the root. Never touches anything above the root.
    pub fn add_file(&self, file_path: &Path, size: u64) {
        let mut current = file_path.parent();
        while let Some(dir) = current {
            let key = path_key(dir);
            let is_root = key == self.root_key;
            if !is_root && !key.starts_with(&self.root_prefix) {
                break;
            }
            self.accumulate(dir, key, size);
            if is_root {
                break;
            }
            current = dir.parent();
        }
    }

    fn accumulate(&self, dir: &Path, key: String, size: u64) {
        if let Some(acc) = self.folders.get(&key) {
            acc.add(size);
            return;
        }
        self.folders
            .entry(key)
            .or_insert_with(|| FolderAccumulator::new(dir))
            .add(size);
    }

    /// Current `(total_size, item_count)` for a directory, if it was touched.
    pub fn get(&self, dir: &Path) -> Option<(u64, u64)> {
        self.folders
            .get(&path_key(dir))
            .map(|acc| (acc.total_size(), acc.item_count()))
    }

    /// Number of distinct directories touched.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Materialise, rank by recursive size (largest first) and cap to `limit`.
    ///
    /// Must only be called once no worker is writing any more. Directories
    /// that can no longer be resolved on disk are dropped.
    pub fn top_folders(&self, limit: usize) -> Vec<FolderRecord> {
        let snapshot: Vec<(PathBuf, u64, u64)> = self
            .folders
            .iter()
            .map(|entry| {
                let acc = entry.value();
                (acc.path().to_path_buf(), acc.total_size(), acc.item_count())
            })
            .collect();

        let mut records: Vec<FolderRecord> = snapshot
            .into_par_iter()
            .filter_map(|(path, size, item_count)| resolve_folder(path, size, item_count))
            .collect();

        records.par_sort_by(|a, b| b.size.cmp(&a.size));
        records.truncate(limit);
        records
    }
}

fn resolve_folder(path: PathBuf, size: u64, item_count: u64) -> Option<FolderRecord> {
    let meta = match std::fs::metadata(&path) {
        Ok(meta) if meta.is_dir() => meta,
        Ok(_) => return None,
        Err(err) => {
            trace!("dropping unresolvable folder {}: {err}", path.display());
            return None;
        }
    };
    Some(FolderRecord {
        name: display_name(&path),
        modified: meta.modified().ok().map(DateTime::<Utc>::from),
        path,
        size,
        item_count,
    })
}
