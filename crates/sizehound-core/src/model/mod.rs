/// Data model for scan results.
///
/// Re-exports the pipeline records and the size formatting helpers.
pub mod records;
pub mod size;

pub use records::{display_name, extension_of, FileDescriptor, FileRecord, FolderRecord};
pub use size::{format_count, format_size, parse_size};
