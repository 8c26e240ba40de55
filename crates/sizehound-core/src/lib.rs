/// SizeHound Core: concurrent scanning, aggregation and export.
///
/// This crate contains all business logic with zero UI dependencies. The
/// console frontend lives in `sizehound-cli`.
///
/// # Modules
///
/// - [`model`]: records flowing through a scan and size formatting.
/// - [`analysis`]: bounded top-N tracking, folder totals, file types.
/// - [`scanner`]: walker, worker pool and the scan orchestrator.
/// - [`export`]: CSV and JSON output of a finished scan.
/// - [`error`]: the crate's error type.
pub mod analysis;
pub mod error;
pub mod export;
pub mod model;
pub mod scanner;

pub use error::ScanError;
pub use scanner::{
    run_scan, start_scan, CancelToken, ScanHandle, ScanOptions, ScanOutcome, ScanProgress,
    ScanResult, ScanState,
};
