/// Scan parameters.
///
/// `ScanOptions` is a plain value: the caller (or the CLI settings store)
/// fills it in, and the scanner treats it as immutable for the lifetime of
/// one scan.
use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of top files / top folders reported.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Parameters for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Directory to scan.
    pub root: PathBuf,
    /// Cap on both the file and the folder result lists.
    pub max_results: usize,
    /// Include dot-files (and, on Windows, hidden/system entries).
    pub include_hidden: bool,
    /// Descend into symlinked directories and count symlinked files.
    pub follow_symlinks: bool,
    /// Only compute folder totals; the top-files list stays empty.
    pub folders_only: bool,
    /// Directories deeper than this are not expanded (root is depth 0).
    pub max_depth: Option<usize>,
    /// Files smaller than this are ignored entirely.
    pub min_file_size: u64,
    /// Requested worker count, clamped by [`ScanOptions::effective_workers`].
    pub workers: usize,
    /// Directory names skipped together with everything beneath them.
    pub excluded_names: Vec<String>,
    /// Glob patterns, or regexes prefixed with `re:`, matched against entry names.
    pub exclude_patterns: Vec<String>,
    /// Expected total bytes, used only to estimate time remaining.
    pub estimated_total_bytes: Option<u64>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            max_results: DEFAULT_MAX_RESULTS,
            include_hidden: false,
            follow_symlinks: false,
            folders_only: false,
            max_depth: None,
            min_file_size: 0,
            workers: num_cpus::get(),
            excluded_names: Vec::new(),
            exclude_patterns: Vec::new(),
            estimated_total_bytes: None,
        }
    }
}

impl ScanOptions {
    /// Default options for scanning `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    pub fn with_include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    pub fn with_follow_symlinks(mut self, yes: bool) -> Self {
        self.follow_symlinks = yes;
        self
    }

    pub fn with_folders_only(mut self, yes: bool) -> Self {
        self.folders_only = yes;
        self
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_min_file_size(mut self, bytes: u64) -> Self {
        self.min_file_size = bytes;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_excluded_name(mut self, name: impl Into<String>) -> Self {
        self.excluded_names.push(name.into());
        self
    }

    pub fn with_exclude_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    pub fn with_estimated_total_bytes(mut self, bytes: Option<u64>) -> Self {
        self.estimated_total_bytes = bytes;
        self
    }

    /// Worker pool size: the requested count clamped to
    /// `[1, 2 × available parallelism]`.
    pub fn effective_workers(&self) -> usize {
        self.workers.clamp(1, 2 * num_cpus::get().max(1))
    }

    /// Check the options before any work is scheduled.
    ///
    /// Returns the canonical scan root on success.
    pub fn validate(&self) -> Result<PathBuf, ScanError> {
        if self.root.as_os_str().is_empty() {
            return Err(ScanError::invalid("scan root must not be empty"));
        }
        if self.max_results == 0 {
            return Err(ScanError::invalid("result cap must be positive"));
        }
        let root = self
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&self.root, e))?;
        if !root.is_dir() {
            return Err(ScanError::RootNotADirectory { path: root });
        }
        Ok(root)
    }
}
