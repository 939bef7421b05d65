//! Error types for gov-meta

/// Result type for gov-meta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gov-meta operations
///
/// Malformed project files are not errors; they resolve to defaults with a
/// warning. What remains are failures no fallback can absorb.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The embedded default schema failed to parse or validate
    #[error("Embedded default schema is invalid: {message}")]
    DefaultSchema { message: String },

    /// Filesystem error from gov-fs
    #[error(transparent)]
    Fs(#[from] gov_fs::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
