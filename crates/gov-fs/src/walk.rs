//! Bounded project traversal
//!
//! Checks never walk the filesystem themselves. A single [`ProjectTree`] is
//! collected per run under a [`TraversalBudget`], in file-name order, so
//! every check sees the same listing and symlink cycles cannot hang a run.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Error, Result};

/// Directories that never count as project content.
const SKIPPED_DIRS: &[&str] = &[".git", "target", "node_modules", ".venv", "__pycache__"];

/// Limits applied to a single traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalBudget {
    /// Maximum directory depth below the root
    pub max_depth: usize,
    /// Maximum number of files recorded
    pub max_files: usize,
}

impl Default for TraversalBudget {
    fn default() -> Self {
        Self {
            max_depth: 12,
            max_files: 20_000,
        }
    }
}

/// Sorted listing of the files under a project root.
#[derive(Debug, Clone)]
pub struct ProjectTree {
    root: PathBuf,
    /// Root-relative paths with forward slashes, sorted
    files: Vec<String>,
    truncated: Option<String>,
}

impl ProjectTree {
    /// Walk `root` within `budget`.
    ///
    /// Symlinks are listed but never followed. Unreadable entries are
    /// skipped. Exceeding the budget stops the walk and is reported through
    /// [`ProjectTree::truncation`] rather than as an error.
    pub fn scan(root: &Path, budget: TraversalBudget) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::Traversal {
                root: root.to_path_buf(),
                message: "project root is not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        let mut truncated = None;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(budget.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !(entry.file_type().is_dir()
                        && SKIPPED_DIRS.iter().any(|d| entry.file_name() == *d))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if entry.depth() == budget.max_depth
                    && truncated.is_none()
                    && has_children(entry.path())
                {
                    truncated = Some(format!(
                        "maximum depth {} reached at {}",
                        budget.max_depth,
                        relative(root, entry.path())
                    ));
                }
                continue;
            }

            if files.len() >= budget.max_files {
                truncated = Some(format!("file budget of {} exhausted", budget.max_files));
                break;
            }
            files.push(relative(root, entry.path()));
        }

        files.sort();
        if let Some(reason) = &truncated {
            tracing::warn!(root = %root.display(), "Traversal truncated: {}", reason);
        }

        Ok(Self {
            root: root.to_path_buf(),
            files,
            truncated,
        })
    }

    /// The project root this tree was collected from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All recorded files, root-relative and sorted.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Why the walk stopped early, if it did.
    pub fn truncation(&self) -> Option<&str> {
        self.truncated.as_deref()
    }

    /// Files whose extension matches one of `extensions` (without dots).
    pub fn files_with_extension<'a>(
        &'a self,
        extensions: &'a [String],
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.files.iter().map(String::as_str).filter(move |f| {
            Path::new(f)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        })
    }

    /// Files whose final component equals one of `names`.
    pub fn files_named<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        self.files.iter().map(String::as_str).filter(move |f| {
            let name = f.rsplit('/').next().unwrap_or(f);
            names.iter().any(|n| n == name)
        })
    }
}

fn has_children(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
