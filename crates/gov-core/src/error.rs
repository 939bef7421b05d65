//! Error types for gov-core

use std::path::PathBuf;

/// Result type for gov-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gov-core operations
///
/// Failures inside a single check never surface here; the engine records
/// them as issues and carries on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured path resolves outside the project root
    #[error("Path boundary violation for '{path}' under {root}: {reason}")]
    PathBoundary {
        path: String,
        root: PathBuf,
        reason: String,
    },

    /// A tool ran but did not produce a usable result
    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution { tool: String, message: String },

    /// Filesystem error from gov-fs
    #[error(transparent)]
    Fs(gov_fs::Error),

    /// Metadata error from gov-meta
    #[error(transparent)]
    Meta(#[from] gov_meta::Error),

    /// Invalid regular expression
    #[error(transparent)]
    Regex(#[from] regex::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<gov_fs::Error> for Error {
    fn from(err: gov_fs::Error) -> Self {
        match err {
            gov_fs::Error::PathEscape { path, root, reason } => {
                Self::PathBoundary { path, root, reason }
            }
            other => Self::Fs(other),
        }
    }
}
