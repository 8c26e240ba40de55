/// Aggregation structures used by the scan workers, plus post-scan analysis.

pub mod file_types;
pub mod folders;
pub mod top_items;

pub use file_types::{analyse_file_types, categorise_extension, categorize, CategoryStats, FileCategory};
pub use folders::{path_key, FolderAccumulator, FolderTotals};
pub use top_items::TopItemsTracker;
