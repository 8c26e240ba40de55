/// Scan lifecycle states and the final result value.
use crate::analysis::CategoryStats;
use crate::model::{FileRecord, FolderRecord};
use crate::scanner::progress::ScanProgress;
use serde::Serialize;
use std::path::PathBuf;

/// Lifecycle of one scan: `Idle → Running → {Completed | Cancelled | Failed}`.
///
/// A [`ScanHandle`](crate::scanner::ScanHandle) only exists once options
/// were accepted, so it starts at `Running`; `Idle` belongs to whoever holds
/// no scan yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ScanState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl ScanState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// How a scan ended. Exactly one applies to every result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ScanOutcome {
    Completed,
    Cancelled,
    Failed(String),
}

/// Everything a finished (or stopped) scan produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub root: PathBuf,
    /// Largest files, descending by size. At most `max_results` entries.
    pub top_files: Vec<FileRecord>,
    /// Largest folders by recursive size. At most `max_results` entries.
    pub top_folders: Vec<FolderRecord>,
    /// Category breakdown of `top_files`; empty in folders-only mode.
    pub file_types: Vec<CategoryStats>,
    /// Final counters with the elapsed time stamped in.
    pub progress: ScanProgress,
    pub outcome: ScanOutcome,
}

impl ScanResult {
    /// An empty result for a scan that failed before producing anything.
    pub fn failed(root: PathBuf, message: impl Into<String>) -> Self {
        Self {
            root,
            top_files: Vec::new(),
            top_folders: Vec::new(),
            file_types: Vec::new(),
            progress: ScanProgress::default(),
            outcome: ScanOutcome::Failed(message.into()),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == ScanOutcome::Completed
    }

    pub fn was_cancelled(&self) -> bool {
        self.outcome == ScanOutcome::Cancelled
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            ScanOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Terminal lifecycle state matching the outcome.
    pub fn state(&self) -> ScanState {
        match self.outcome {
            ScanOutcome::Completed => ScanState::Completed,
            ScanOutcome::Cancelled => ScanState::Cancelled,
            ScanOutcome::Failed(_) => ScanState::Failed,
        }
    }
}
