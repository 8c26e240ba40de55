/// Entry consumers: the worker side of the pipeline.
///
/// Each worker drains descriptors from the shared dispatch channel until the
/// walker closes it or the scan is stopped. A descriptor is owned by exactly
/// one worker once received.
use crate::error::ScanError;
use crate::model::{FileDescriptor, FileRecord};
use crate::scanner::pipeline::{Pipeline, CHANNEL_POLL};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::debug;

/// Worker loop. Returns early with an error only if the shared tracker
/// rejects an insert.
pub(crate) fn run(
    pipeline: &Pipeline<'_>,
    rx: Receiver<FileDescriptor>,
    worker: usize,
) -> Result<(), ScanError> {
    let _guard = pipeline.abort_on_panic();
    let mut processed: u64 = 0;

    loop {
        if pipeline.should_stop() {
            debug!("worker {worker} stopping after {processed} entries");
            return Ok(());
        }
        match rx.recv_timeout(CHANNEL_POLL) {
            Ok(desc) => {
                process(pipeline, desc)?;
                processed += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!("worker {worker} drained channel after {processed} entries");
    Ok(())
}

/// Fold one entry into the shared aggregates.
///
/// Directories need no work here: the walker already expanded and counted
/// them. Files always count towards their ancestors' totals, even when their
/// name matches an exclusion pattern or the scan is folders-only; they are
/// only kept out of the top-files list.
fn process(pipeline: &Pipeline<'_>, desc: FileDescriptor) -> Result<(), ScanError> {
    if desc.is_dir {
        return Ok(());
    }

    pipeline.folders.add_file(&desc.path, desc.size);
    pipeline.counters.record_bytes(desc.size);

    if !pipeline.options.folders_only && !pipeline.rules.matches_pattern(&desc.name) {
        pipeline.top_files.add(FileRecord::from_descriptor(desc))?;
    }
    Ok(())
}
