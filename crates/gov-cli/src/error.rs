//! Error types for gov-cli

use gov_tools::ErrorKind;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Process exit statuses
pub mod exit {
    pub const SUCCESS: i32 = 0;
    /// Below threshold, audit failed or not compliant
    pub const FAILED: i32 = 1;
    pub const INTERNAL: i32 = 2;
    pub const TOOL_LOAD: i32 = 3;
    pub const PATH_BOUNDARY: i32 = 4;
}

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from tool resolution or execution
    #[error(transparent)]
    Tools(#[from] gov_tools::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Exit status reported for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Tools(e) => match e.kind() {
                ErrorKind::ToolLoad => exit::TOOL_LOAD,
                ErrorKind::PathBoundary => exit::PATH_BOUNDARY,
                ErrorKind::Internal | ErrorKind::Execution => exit::INTERNAL,
            },
            Self::Json(_) | Self::Io(_) | Self::User { .. } => exit::INTERNAL,
        }
    }
}
