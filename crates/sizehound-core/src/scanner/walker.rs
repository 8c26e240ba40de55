/// Directory walker: the producer side of the pipeline.
///
/// Iterative depth-first traversal over an explicit LIFO stack of
/// `(directory, depth)` pairs, so arbitrarily deep trees never grow the
/// native call stack. Each popped directory is listed one level at a time;
/// kept children become [`FileDescriptor`]s on the bounded dispatch
/// channel, and child directories are pushed for later expansion.
///
/// Unreadable or vanished entries are skipped. The walker never fails the
/// scan. When the stack is empty (or the scan is stopped) the sender is
/// dropped, which closes the channel for the workers.
use crate::model::FileDescriptor;
use crate::scanner::pipeline::{Pipeline, CHANNEL_POLL};
use crate::scanner::progress::PROGRESS_EVERY;
use compact_str::CompactString;
use crossbeam_channel::{SendTimeoutError, Sender};
use std::collections::HashSet;
use std::fs::{self, DirEntry, Metadata};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Walk the tree below `pipeline.root`, feeding `tx` until done or stopped.
pub(crate) fn run(pipeline: &Pipeline<'_>, tx: Sender<FileDescriptor>) {
    let _guard = pipeline.abort_on_panic();
    let options = pipeline.options;

    let mut stack: Vec<(PathBuf, usize)> = vec![(pipeline.root.clone(), 0)];
    // Canonical directories already listed. Only needed when symlinks are
    // followed, where a link back up the tree would otherwise loop forever.
    let mut expanded: HashSet<PathBuf> = HashSet::new();

    while let Some((dir, depth)) = stack.pop() {
        if pipeline.should_stop() {
            debug!("walker stopping with {} directories pending", stack.len());
            return;
        }
        if options.max_depth.is_some_and(|max| depth > max) {
            continue;
        }
        if options.follow_symlinks {
            match dir.canonicalize() {
                Ok(canonical) => {
                    if !expanded.insert(canonical) {
                        trace!("already expanded {}", dir.display());
                        continue;
                    }
                }
                Err(err) => {
                    debug!("skipping {}: {err}", dir.display());
                    continue;
                }
            }
        }

        pipeline.counters.set_current_path(&dir);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("cannot list {}: {err}", dir.display());
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    trace!("unreadable entry in {}: {err}", dir.display());
                    continue;
                }
            };
            let Some(desc) = describe(pipeline, entry) else {
                continue;
            };

            let is_dir = desc.is_dir;
            if is_dir {
                stack.push((desc.path.clone(), depth + 1));
            }
            if !dispatch(pipeline, &tx, desc) {
                debug!("walker stopped while the dispatch channel was full");
                return;
            }

            let seen = if is_dir {
                pipeline.counters.record_folder()
            } else {
                pipeline.counters.record_file()
            };
            if seen % PROGRESS_EVERY == 0 {
                pipeline.report_progress();
            }
        }
    }
    debug!("walker finished");
}

/// Apply the per-entry filters and build a descriptor for a kept entry.
fn describe(pipeline: &Pipeline<'_>, entry: DirEntry) -> Option<FileDescriptor> {
    let options = pipeline.options;
    let path = entry.path();
    let name = entry.file_name();
    let name = name.to_string_lossy();

    let file_type = match entry.file_type() {
        Ok(ft) => ft,
        Err(err) => {
            trace!("no file type for {}: {err}", path.display());
            return None;
        }
    };

    let meta = if file_type.is_symlink() {
        if !options.follow_symlinks {
            trace!("skipping symlink {}", path.display());
            return None;
        }
        // Broken links fail here and are dropped.
        fs::metadata(&path).ok()?
    } else {
        entry.metadata().ok()?
    };

    if !options.include_hidden && is_hidden(&name, &meta) {
        trace!("skipping hidden {}", path.display());
        return None;
    }

    let is_dir = meta.is_dir();
    if is_dir {
        if pipeline.rules.excludes_dir(&name) {
            debug!("excluded directory {}", path.display());
            return None;
        }
    } else if meta.len() < options.min_file_size {
        return None;
    }

    Some(FileDescriptor {
        name: CompactString::new(&name),
        path,
        size: if is_dir { 0 } else { meta.len() },
        modified: meta.modified().ok(),
        is_dir,
    })
}

/// Blocking send that gives up once the pipeline is stopped.
///
/// Returns `false` if the descriptor could not be delivered.
fn dispatch(pipeline: &Pipeline<'_>, tx: &Sender<FileDescriptor>, desc: FileDescriptor) -> bool {
    let mut desc = desc;
    loop {
        match tx.send_timeout(desc, CHANNEL_POLL) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(back)) => {
                if pipeline.should_stop() {
                    return false;
                }
                desc = back;
            }
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}

/// Dot-files everywhere; on Windows also entries flagged hidden or system.
fn is_hidden(name: &str, meta: &Metadata) -> bool {
    if name.starts_with('.') {
        return true;
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
        const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;
        meta.file_attributes() & (FILE_ATTRIBUTE_HIDDEN | FILE_ATTRIBUTE_SYSTEM) != 0
    }
    #[cfg(not(windows))]
    {
        let _ = meta;
        false
    }
}
