//! Error types for gov-tools

use gov_core::Role;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification callers use to pick an exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Internal or configuration failure no fallback could absorb
    Internal,
    /// A custom tool could not be loaded or failed its capability check
    ToolLoad,
    /// A configured path resolves outside the project root
    PathBoundary,
    /// A tool ran and failed
    Execution,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot load custom {role} from '{module}': {reason}")]
    ToolLoad {
        role: Role,
        module: String,
        reason: String,
    },

    #[error("Custom {role} '{module}' is missing required capability '{capability}'")]
    MissingCapability {
        role: Role,
        module: String,
        capability: String,
    },

    #[error(transparent)]
    Core(#[from] gov_core::Error),

    #[error(transparent)]
    Meta(#[from] gov_meta::Error),

    #[error(transparent)]
    Fs(#[from] gov_fs::Error),
}

impl Error {
    pub fn load(role: Role, module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ToolLoad {
            role,
            module: module.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ToolLoad { .. } | Self::MissingCapability { .. } => ErrorKind::ToolLoad,
            Self::Core(gov_core::Error::PathBoundary { .. })
            | Self::Fs(gov_fs::Error::PathEscape { .. }) => ErrorKind::PathBoundary,
            Self::Core(gov_core::Error::ToolExecution { .. }) => ErrorKind::Execution,
            _ => ErrorKind::Internal,
        }
    }
}
