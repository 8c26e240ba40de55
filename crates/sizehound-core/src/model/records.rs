/// Records flowing through the scan pipeline.
///
/// `FileDescriptor` is the ephemeral message the walker puts on the dispatch
/// channel. `FileRecord` and `FolderRecord` are the immutable values that end
/// up in a `ScanResult`.
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One entry discovered by the walker. Consumed exactly once by a worker.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: CompactString,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub is_dir: bool,
}

/// A file selected into the top-files list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// File name only.
    pub name: CompactString,
    /// Full path.
    pub path: PathBuf,
    /// Logical size in bytes.
    pub size: u64,
    /// Lowercased extension without the dot; empty when there is none.
    pub extension: CompactString,
    pub modified: Option<DateTime<Utc>>,
}

impl FileRecord {
    /// Build a record from a walker descriptor.
    pub fn from_descriptor(desc: FileDescriptor) -> Self {
        let extension = extension_of(&desc.name);
        Self {
            name: desc.name,
            path: desc.path,
            size: desc.size,
            extension,
            modified: desc.modified.map(DateTime::<Utc>::from),
        }
    }
}

/// A directory with its recursive totals, materialised after all workers join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderRecord {
    pub name: CompactString,
    pub path: PathBuf,
    /// Sum of the sizes of every counted file beneath this directory.
    pub size: u64,
    /// Number of counted files beneath this directory.
    pub item_count: u64,
    /// Last-modified time of the directory itself.
    pub modified: Option<DateTime<Utc>>,
}

/// Lowercased extension of a file name, without the leading dot.
///
/// Dotfiles such as `.bashrc` have no extension.
pub fn extension_of(name: &str) -> CompactString {
    match Path::new(name).extension() {
        Some(ext) => CompactString::new(ext.to_string_lossy().to_ascii_lowercase()),
        None => CompactString::default(),
    }
}

/// Display name for a path: the final component, or the whole path for
/// roots like `/` or `C:\`.
pub fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
