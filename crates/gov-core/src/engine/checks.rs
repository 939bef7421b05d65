//! Evaluation of individual check rules
//!
//! Rules read the filesystem through [`gov_fs::contained_path`] so a custom
//! schema cannot point a check outside the project. Tree-wide rules only
//! look at the files collected in the run's [`ProjectTree`].

use std::fs;

use gov_fs::{ProjectTree, contained_path};
use gov_meta::CheckRule;
use regex::Regex;

use crate::Result;

/// Files larger than this are not scanned for patterns
const MAX_SCAN_BYTES: u64 = 1024 * 1024;

/// Offending paths listed in a detail message
const MAX_LISTED: usize = 3;

/// Result of evaluating one rule
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Credit earned, 0.0 to 1.0
    pub credit: f64,
    /// Why credit was withheld
    pub detail: Option<String>,
    /// Most relevant path for the finding
    pub location: Option<String>,
}

impl Outcome {
    fn pass() -> Self {
        Self {
            credit: 1.0,
            detail: None,
            location: None,
        }
    }

    fn fail(detail: impl Into<String>, location: Option<&str>) -> Self {
        Self::partial(0.0, detail, location)
    }

    fn partial(credit: f64, detail: impl Into<String>, location: Option<&str>) -> Self {
        Self {
            credit: credit.clamp(0.0, 1.0),
            detail: Some(detail.into()),
            location: location.map(str::to_string),
        }
    }

    fn from_bool(passed: bool, detail: impl Into<String>, location: &str) -> Self {
        if passed {
            Self::pass()
        } else {
            Self::fail(detail, Some(location))
        }
    }
}

/// Evaluate `rule` against the project described by `tree`.
pub fn evaluate(rule: &CheckRule, tree: &ProjectTree) -> Result<Outcome> {
    let root = tree.root();
    match rule {
        CheckRule::FileExists { path } => {
            let found = contained_path(root, path)?.is_file();
            Ok(Outcome::from_bool(found, format!("{} not found", path), path))
        }
        CheckRule::DirExists { path } => {
            let found = contained_path(root, path)?.is_dir();
            Ok(Outcome::from_bool(
                found,
                format!("directory {} not found", path),
                path,
            ))
        }
        CheckRule::AnyPathExists { paths } => {
            for path in paths {
                if contained_path(root, path)?.exists() {
                    return Ok(Outcome::pass());
                }
            }
            Ok(Outcome::fail(
                format!("none of {} found", paths.join(", ")),
                paths.first().map(String::as_str),
            ))
        }
        CheckRule::FilesExist { paths } => {
            let mut missing = Vec::new();
            for path in paths {
                if !contained_path(root, path)?.exists() {
                    missing.push(path.as_str());
                }
            }
            if missing.is_empty() {
                return Ok(Outcome::pass());
            }
            let credit = 1.0 - missing.len() as f64 / paths.len() as f64;
            Ok(Outcome::partial(
                credit,
                format!("missing {}", missing.join(", ")),
                missing.first().copied(),
            ))
        }
        CheckRule::FileContains { path, pattern } => {
            let regex = Regex::new(pattern)?;
            let file = contained_path(root, path)?;
            if !file.is_file() {
                return Ok(Outcome::fail(format!("{} not found", path), Some(path)));
            }
            let content = fs::read_to_string(&file)?;
            Ok(Outcome::from_bool(
                regex.is_match(&content),
                format!("{} does not match /{}/", path, pattern),
                path,
            ))
        }
        CheckRule::MinLines { path, lines } => {
            let file = contained_path(root, path)?;
            if !file.is_file() {
                return Ok(Outcome::fail(format!("{} not found", path), Some(path)));
            }
            let content = fs::read_to_string(&file)?;
            let count = content.lines().filter(|l| !l.trim().is_empty()).count();
            if count >= *lines {
                return Ok(Outcome::pass());
            }
            Ok(Outcome::partial(
                count as f64 / *lines as f64,
                format!("{} has {} of {} required lines", path, count, lines),
                Some(path),
            ))
        }
        CheckRule::ForbiddenPattern {
            extensions,
            pattern,
        } => {
            let regex = Regex::new(pattern)?;
            let mut offenders = Vec::new();
            for relative in tree.files_with_extension(extensions) {
                if let Some(content) = read_scannable(tree, relative)
                    && regex.is_match(&content)
                {
                    offenders.push(relative);
                }
            }
            if offenders.is_empty() {
                return Ok(Outcome::pass());
            }
            Ok(Outcome::partial(
                1.0 / (1.0 + offenders.len() as f64),
                format!("found in {}", list_paths(&offenders)),
                offenders.first().copied(),
            ))
        }
        CheckRule::ForbiddenFiles { names } => {
            let found: Vec<&str> = tree.files_named(names).collect();
            if found.is_empty() {
                return Ok(Outcome::pass());
            }
            Ok(Outcome::fail(
                format!("found {}", list_paths(&found)),
                found.first().copied(),
            ))
        }
    }
}

/// Read a tree file for pattern scanning; skips oversized, unreadable and
/// non-UTF-8 files.
fn read_scannable(tree: &ProjectTree, relative: &str) -> Option<String> {
    let path = tree.root().join(relative);
    let metadata = fs::metadata(&path).ok()?;
    if metadata.len() > MAX_SCAN_BYTES {
        tracing::debug!(file = relative, "Skipping oversized file");
        return None;
    }
    let bytes = fs::read(&path).ok()?;
    String::from_utf8(bytes).ok()
}

fn list_paths(paths: &[&str]) -> String {
    let shown: Vec<&str> = paths.iter().take(MAX_LISTED).copied().collect();
    let mut listed = format!("{} file(s): {}", paths.len(), shown.join(", "));
    if paths.len() > MAX_LISTED {
        listed.push_str(&format!(" (+{} more)", paths.len() - MAX_LISTED));
    }
    listed
}
