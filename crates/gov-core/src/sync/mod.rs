//! Version synchronization
//!
//! One canonical file supplies the version; every configured target is
//! compared against it. `preview` only reads. `apply` rewrites the matched
//! substrings through [`gov_fs::io::write_text`] and is a fixed point:
//! a second run finds nothing to change.
//!
//! All configured paths are checked against the project root before any
//! file is opened. An escaping path stops the run; everything else that can
//! go wrong with a single file (missing, unreadable, no match, bad pattern)
//! becomes a warning in the result.
//!
//! Rules naming the same file are merged into one write. A file is only
//! rewritten when every rule naming it reads the canonical version back
//! from the result; otherwise it is left untouched with a warning.

mod extract;

use std::ops::Range;
use std::path::PathBuf;

use gov_fs::{NormalizedPath, contained_path};
use gov_meta::{ExtractionRule, SyncSettings};
use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::roles::{Synchronizer, Tool};
use crate::Result;
use extract::{Extractor, Occurrence, splice};

/// One substring that differs from the canonical version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncChange {
    /// Project-relative path of the target
    pub path: String,
    /// 1-based line of the occurrence
    pub line: usize,
    pub before: String,
    pub after: String,
}

/// A target as observed at sync start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTarget {
    pub path: String,
    /// First extracted version, if any
    pub observed: Option<String>,
}

/// Outcome of a preview or apply run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// Project-relative path of the canonical source
    pub source: String,
    /// Canonical version, if it could be extracted
    pub canonical: Option<String>,
    pub targets: Vec<SyncTarget>,
    /// Mismatches found (preview) or rewritten (apply)
    pub changes: Vec<SyncChange>,
    /// Whether files were written
    pub applied: bool,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl SyncResult {
    /// True when every target already matches the canonical version
    pub fn is_in_sync(&self) -> bool {
        self.changes.is_empty()
    }
}

/// The built-in synchronizer
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionSynchronizer;

impl VersionSynchronizer {
    pub const NAME: &'static str = "default-synchronizer";

    pub fn new() -> Self {
        Self
    }

    fn run(&self, ctx: &RunContext, settings: &SyncSettings, write: bool) -> Result<SyncResult> {
        let plan = Plan::build(ctx, settings)?;
        let mut result = plan.result;

        if write {
            for pending in &plan.writes {
                let target = NormalizedPath::from(pending.file.as_path());
                gov_fs::io::write_text(&target, &pending.updated)?;
                tracing::info!(
                    target_file = %pending.path,
                    count = pending.count,
                    "Rewrote version"
                );
            }
            result.applied = !plan.writes.is_empty();
        }

        Ok(result)
    }
}

impl Tool for VersionSynchronizer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }
}

impl Synchronizer for VersionSynchronizer {
    fn preview(&self, ctx: &RunContext, settings: &SyncSettings) -> Result<SyncResult> {
        self.run(ctx, settings, false)
    }

    fn apply(&self, ctx: &RunContext, settings: &SyncSettings) -> Result<SyncResult> {
        self.run(ctx, settings, true)
    }
}

/// Edits collected for one target file from every rule naming it
struct Rewrite {
    file: PathBuf,
    /// First configured path naming the file
    path: String,
    content: String,
    ranges: Vec<Range<usize>>,
    /// Rules that must read back the canonical value once rewritten
    rules: Vec<(Extractor, bool)>,
    changes: Vec<SyncChange>,
}

impl Rewrite {
    /// Whether every rule reads `canonical` back from `updated`.
    fn settles(&self, updated: &str, canonical: &str) -> bool {
        self.rules.iter().all(|(extractor, all)| {
            let found = extractor.find(updated, *all);
            !found.is_empty() && found.iter().all(|o| o.value == canonical)
        })
    }
}

/// A file ready to be written
struct PendingWrite {
    file: PathBuf,
    path: String,
    updated: String,
    count: usize,
}

struct Plan {
    result: SyncResult,
    writes: Vec<PendingWrite>,
}

impl Plan {
    /// Every write is decided here; apply only performs them.
    fn build(ctx: &RunContext, settings: &SyncSettings) -> Result<Self> {
        let root = ctx.root();

        // Every path is checked before anything is read
        let canonical_file = contained_path(root, &settings.canonical.path)?;
        let target_files = settings
            .targets
            .iter()
            .map(|t| contained_path(root, &t.rule.path))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut result = SyncResult {
            source: settings.canonical.path.clone(),
            ..SyncResult::default()
        };

        let canonical = match read_first(&canonical_file, &settings.canonical) {
            Ok(value) => value,
            Err(warning) => {
                warn(&mut result, warning);
                None
            }
        };
        let Some(canonical) = canonical else {
            if result.warnings.is_empty() {
                warn(
                    &mut result,
                    format!("No version found in canonical source {}", settings.canonical.path),
                );
            }
            return Ok(Self {
                result,
                writes: Vec::new(),
            });
        };
        let canonical_semver = semver::Version::parse(&canonical).ok();
        result.canonical = Some(canonical.clone());

        let mut rewrites: Vec<Rewrite> = Vec::new();
        for (spec, file) in settings.targets.iter().zip(target_files) {
            let path = spec.rule.path.clone();
            let extractor = match Extractor::new(spec.rule.pattern.as_deref()) {
                Ok(e) => e,
                Err(e) => {
                    warn(&mut result, format!("Invalid pattern for {}: {}", path, e));
                    result.targets.push(SyncTarget { path, observed: None });
                    continue;
                }
            };
            let content = match read(&file, &path) {
                Ok(c) => c,
                Err(warning) => {
                    warn(&mut result, warning);
                    result.targets.push(SyncTarget { path, observed: None });
                    continue;
                }
            };

            let found = extractor.find(&content, spec.all);
            result.targets.push(SyncTarget {
                path: path.clone(),
                observed: found.first().map(|o| o.value.clone()),
            });
            if found.is_empty() {
                warn(&mut result, format!("No version found in {}", path));
                continue;
            }

            let stale: Vec<Occurrence> = found
                .into_iter()
                .filter(|o| o.value != canonical)
                .collect();
            if stale.is_empty() {
                continue;
            }

            let ranges: Vec<_> = stale.iter().map(|o| o.range.clone()).collect();
            let alone = splice(&content, &ranges, &canonical);
            let own = Rewrite {
                file: file.clone(),
                path: path.clone(),
                content: content.clone(),
                ranges,
                rules: vec![(extractor.clone(), spec.all)],
                changes: Vec::new(),
            };
            if !own.settles(&alone, &canonical) {
                warn(
                    &mut result,
                    format!(
                        "Pattern for {} does not read back {} after rewriting; left unchanged",
                        path, canonical
                    ),
                );
                continue;
            }

            let index = match rewrites.iter().position(|r| r.file == file) {
                Some(index) => index,
                None => {
                    rewrites.push(Rewrite {
                        ranges: Vec::new(),
                        rules: Vec::new(),
                        ..own
                    });
                    rewrites.len() - 1
                }
            };
            let rewrite = &mut rewrites[index];

            // Another rule on the same file may already cover these bytes
            let fresh: Vec<&Occurrence> = stale
                .iter()
                .filter(|o| !rewrite.ranges.contains(&o.range))
                .collect();
            let overlapping = fresh.iter().any(|o| {
                rewrite
                    .ranges
                    .iter()
                    .any(|r| o.range.start < r.end && r.start < o.range.end)
            });
            if overlapping {
                warn(
                    &mut result,
                    format!(
                        "Sync target {} overlaps another target in the same file; left unchanged",
                        path
                    ),
                );
                continue;
            }

            rewrite.rules.push((extractor, spec.all));
            for occurrence in fresh {
                if let (Some(canon), Ok(observed)) =
                    (&canonical_semver, semver::Version::parse(&occurrence.value))
                    && observed > *canon
                {
                    warn(
                        &mut result,
                        format!(
                            "{} line {} has {} which is ahead of canonical {}",
                            path, occurrence.line, occurrence.value, canonical
                        ),
                    );
                }
                rewrite.ranges.push(occurrence.range.clone());
                rewrite.changes.push(SyncChange {
                    path: path.clone(),
                    line: occurrence.line,
                    before: occurrence.value.clone(),
                    after: canonical.clone(),
                });
            }
        }

        let mut writes = Vec::new();
        for rewrite in rewrites {
            let updated = splice(&rewrite.content, &rewrite.ranges, &canonical);
            if !rewrite.settles(&updated, &canonical) {
                warn(
                    &mut result,
                    format!(
                        "Sync targets in {} disagree once rewritten; left unchanged",
                        rewrite.path
                    ),
                );
                continue;
            }
            writes.push(PendingWrite {
                count: rewrite.ranges.len(),
                file: rewrite.file,
                path: rewrite.path,
                updated,
            });
            result.changes.extend(rewrite.changes);
        }

        tracing::debug!(
            canonical = %canonical,
            changes = result.changes.len(),
            "Sync plan built"
        );
        Ok(Self { result, writes })
    }
}

fn warn(result: &mut SyncResult, warning: String) {
    tracing::warn!("{}", warning);
    result.warnings.push(warning);
}

fn read(file: &std::path::Path, path: &str) -> std::result::Result<String, String> {
    if !file.is_file() {
        return Err(format!("Sync file {} not found", path));
    }
    gov_fs::io::read_text(&NormalizedPath::from(file))
        .map_err(|e| format!("Sync file {} could not be read: {}", path, e))
}

fn read_first(
    file: &std::path::Path,
    rule: &ExtractionRule,
) -> std::result::Result<Option<String>, String> {
    let extractor = Extractor::new(rule.pattern.as_deref())
        .map_err(|e| format!("Invalid pattern for {}: {}", rule.path, e))?;
    let content = read(file, &rule.path)?;
    Ok(extractor.find(&content, false).into_iter().next().map(|o| o.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use gov_meta::SyncTargetSpec;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn settings(targets: &[(&str, bool)]) -> SyncSettings {
        SyncSettings {
            canonical: ExtractionRule {
                path: "VERSION".to_string(),
                pattern: None,
            },
            targets: targets
                .iter()
                .map(|(path, all)| SyncTargetSpec {
                    rule: ExtractionRule {
                        path: path.to_string(),
                        pattern: None,
                    },
                    all: *all,
                })
                .collect(),
        }
    }

    #[test]
    fn all_rewrites_every_occurrence() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("VERSION"), "2.0.0\n").unwrap();
        fs::write(temp.path().join("doc.md"), "1.0.0 then 1.5.0\n").unwrap();
        let ctx = RunContext::new(temp.path());

        let result = VersionSynchronizer
            .apply(&ctx, &settings(&[("doc.md", true)]))
            .unwrap();
        assert!(result.applied);
        assert_eq!(result.changes.len(), 2);
        assert_eq!(
            fs::read_to_string(temp.path().join("doc.md")).unwrap(),
            "2.0.0 then 2.0.0\n"
        );
    }

    #[test]
    fn missing_target_is_a_warning() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("VERSION"), "2.0.0\n").unwrap();
        let ctx = RunContext::new(temp.path());

        let result = VersionSynchronizer
            .preview(&ctx, &settings(&[("absent.txt", false)]))
            .unwrap();
        assert!(result.is_in_sync());
        assert_eq!(result.targets[0].observed, None);
        assert!(result.warnings[0].contains("absent.txt"));
    }

    #[test]
    fn missing_canonical_yields_no_changes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("doc.md"), "1.0.0").unwrap();
        let ctx = RunContext::new(temp.path());

        let result = VersionSynchronizer
            .preview(&ctx, &settings(&[("doc.md", false)]))
            .unwrap();
        assert_eq!(result.canonical, None);
        assert!(result.changes.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn target_ahead_of_canonical_is_flagged() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("VERSION"), "1.0.0").unwrap();
        fs::write(temp.path().join("doc.md"), "3.0.0").unwrap();
        let ctx = RunContext::new(temp.path());

        let result = VersionSynchronizer
            .preview(&ctx, &settings(&[("doc.md", false)]))
            .unwrap();
        assert_eq!(result.changes.len(), 1);
        assert!(result.warnings[0].contains("ahead of canonical"));
    }

    #[test]
    fn invalid_target_pattern_is_a_warning() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("VERSION"), "1.0.0").unwrap();
        fs::write(temp.path().join("doc.md"), "0.9.0").unwrap();
        let mut settings = settings(&[("doc.md", false)]);
        settings.targets[0].rule.pattern = Some("(".to_string());

        let result = VersionSynchronizer
            .preview(&RunContext::new(temp.path()), &settings)
            .unwrap();
        assert!(result.changes.is_empty());
        assert!(result.warnings[0].contains("Invalid pattern"));
    }

    #[test]
    fn escaping_target_stops_before_reading() {
        let temp = TempDir::new().unwrap();
        let ctx = RunContext::new(temp.path());

        // No canonical file exists; the boundary error wins over the read warning
        let err = VersionSynchronizer
            .preview(&ctx, &settings(&[("../../etc/passwd", false)]))
            .unwrap_err();
        assert!(matches!(err, crate::Error::PathBoundary { .. }));
    }
}
