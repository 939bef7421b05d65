//! Error types for gov-fs

use std::path::PathBuf;

/// Result type for gov-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gov-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured path resolves outside the project root
    #[error("Path '{path}' escapes project root {root}: {reason}")]
    PathEscape {
        path: String,
        root: PathBuf,
        reason: String,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Traversal of {root} failed: {message}")]
    Traversal { root: PathBuf, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn escape(
        path: impl Into<String>,
        root: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::PathEscape {
            path: path.into(),
            root: root.into(),
            reason: reason.into(),
        }
    }
}
