/// Error types for the scanning engine.
///
/// Only option validation and tracker misuse surface as `Err` values to
/// callers of the scan API. Everything that goes wrong once the pipeline is
/// running is folded into the returned `ScanResult` instead.
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the scanning engine.
#[derive(Debug, Error)]
pub enum ScanError {
    /// An argument was out of range or malformed.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The scan root does not exist.
    #[error("scan root not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    /// The scan root exists but is not a directory.
    #[error("scan root is not a directory: {}", path.display())]
    RootNotADirectory { path: PathBuf },

    /// A `TopItemsTracker` was used after `dispose()`.
    #[error("tracker has been disposed")]
    Disposed,

    /// I/O failure with path context.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pipeline thread could not be started.
    #[error("failed to spawn scan thread: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    /// A pipeline thread panicked.
    #[error("scan thread panicked: {message}")]
    WorkerPanicked { message: String },
}

impl ScanError {
    /// Shorthand for [`ScanError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an I/O error with path context, mapping `NotFound` on the
    /// root to [`ScanError::RootNotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::RootNotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Build a [`ScanError::WorkerPanicked`] from a `JoinHandle::join` payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::WorkerPanicked { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_root_not_found() {
        let err = ScanError::io(
            "/no/such/dir",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }

    #[test]
    fn io_other_kinds_keep_source() {
        let err = ScanError::io(
            "/locked",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::Io { .. }));
        assert!(err.to_string().contains("/locked"));
    }

    #[test]
    fn panic_payload_is_preserved() {
        let err = ScanError::from_panic(Box::new("boom"));
        assert_eq!(err.to_string(), "scan thread panicked: boom");

        let err = ScanError::from_panic(Box::new(String::from("owned boom")));
        assert!(err.to_string().contains("owned boom"));
    }
}
