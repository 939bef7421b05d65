//! Normalized path handling and project-root containment

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Only separators are rewritten; `.` and `..` segments are kept as given so
/// the path still names the same location relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

/// Anchor a project root so it no longer depends on the working directory.
///
/// Existing roots are canonicalized; a root that does not exist yet is made
/// absolute against the current directory. If neither works the input is
/// returned unchanged.
pub fn absolute_root(root: &Path) -> PathBuf {
    dunce::canonicalize(root)
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf())
}

/// Resolve a configured, project-relative path against `root`.
///
/// Rejects absolute paths and any `..` sequence that climbs above the root
/// before the filesystem is touched. If part of the resolved path already
/// exists, its canonical form must still live under the canonical root, so a
/// symlink inside the project cannot redirect reads or writes elsewhere.
pub fn contained_path(root: &Path, relative: &str) -> Result<PathBuf> {
    let trimmed = relative.trim();
    if trimmed.is_empty() {
        return Err(Error::escape(relative, root, "path is empty"));
    }

    let unified = trimmed.replace('\\', "/");
    if unified.starts_with('/') || has_drive_prefix(&unified) {
        return Err(Error::escape(relative, root, "absolute paths are not allowed"));
    }

    let mut parts: Vec<String> = Vec::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(Error::escape(
                        relative,
                        root,
                        "'..' climbs above the project root",
                    ));
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::escape(relative, root, "absolute paths are not allowed"));
            }
        }
    }
    if parts.is_empty() {
        return Err(Error::escape(relative, root, "path resolves to the project root itself"));
    }

    let candidate = parts.iter().fold(root.to_path_buf(), |acc, p| acc.join(p));
    ensure_no_symlink_escape(root, &candidate, relative)?;
    Ok(candidate)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn ensure_no_symlink_escape(root: &Path, candidate: &Path, relative: &str) -> Result<()> {
    let Ok(canonical_root) = dunce::canonicalize(root) else {
        // Root does not exist yet; nothing on disk can redirect us.
        return Ok(());
    };

    let mut cursor = Some(candidate);
    while let Some(current) = cursor {
        if current.symlink_metadata().is_ok() {
            let resolved = dunce::canonicalize(current).map_err(|e| Error::io(current, e))?;
            if !resolved.starts_with(&canonical_root) {
                return Err(Error::escape(
                    relative,
                    root,
                    format!("resolves through a link to {}", resolved.display()),
                ));
            }
            return Ok(());
        }
        cursor = current.parent().filter(|p| p.starts_with(root));
    }
    Ok(())
}
