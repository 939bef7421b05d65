//! Filesystem abstraction for the governance engine
//!
//! Provides normalized paths, project-root boundary enforcement,
//! atomic writes and bounded directory traversal.

pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use error::{Error, Result};
pub use path::{NormalizedPath, absolute_root, contained_path};
pub use walk::{ProjectTree, TraversalBudget};
