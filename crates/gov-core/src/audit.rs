//! Default auditor
//!
//! Adds repository metadata checks on top of a validation run: required
//! files, changelog freshness, and whether validation raised any errors.

use std::fs;
use std::sync::LazyLock;

use chrono::NaiveDate;
use gov_fs::contained_path;
use gov_meta::AuditSettings;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::engine::Grade;
use crate::model::{Issue, Severity, ValidationResult};
use crate::roles::{Auditor, Tool};
use crate::Result;

/// Category used for issues raised by failed audit findings
pub const AUDIT_CATEGORY: &str = "audit";

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("date pattern is valid")
});

/// Result of one metadata check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFinding {
    /// Check identifier, e.g. `required-file:README.md`
    pub check: String,
    pub passed: bool,
    pub message: String,
}

/// Validation outcome combined with metadata findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    /// Validation score carried over
    pub score: f64,
    pub grade: Grade,
    pub findings: Vec<AuditFinding>,
    /// Validation issues followed by one issue per failed finding
    pub issues: Vec<Issue>,
    /// True when every finding passed
    pub passed: bool,
}

impl AuditResult {
    pub fn failed_findings(&self) -> impl Iterator<Item = &AuditFinding> {
        self.findings.iter().filter(|f| !f.passed)
    }
}

/// The built-in auditor
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAuditor;

impl DefaultAuditor {
    pub const NAME: &'static str = "default-auditor";

    pub fn new() -> Self {
        Self
    }
}

impl Tool for DefaultAuditor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }
}

impl Auditor for DefaultAuditor {
    fn audit(
        &self,
        ctx: &RunContext,
        validation: &ValidationResult,
        settings: &AuditSettings,
    ) -> Result<AuditResult> {
        let root = ctx.root();

        let required = settings
            .required_files
            .iter()
            .map(|f| contained_path(root, f).map(|p| (f, p)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let changelog = contained_path(root, &settings.changelog)?;

        let mut findings = Vec::with_capacity(required.len() + 2);

        for (name, path) in required {
            let present = path.is_file();
            findings.push(AuditFinding {
                check: format!("required-file:{}", name),
                passed: present,
                message: if present {
                    format!("{} is present", name)
                } else {
                    format!("{} is missing", name)
                },
            });
        }

        findings.push(changelog_freshness(
            &changelog,
            &settings.changelog,
            ctx.today,
            settings.freshness_days,
        ));

        let errors = validation.issues_at_least(Severity::Error).count();
        findings.push(AuditFinding {
            check: "validation-errors".to_string(),
            passed: errors == 0,
            message: if errors == 0 {
                "Validation raised no errors".to_string()
            } else {
                format!("Validation raised {} error(s)", errors)
            },
        });

        let mut issues = validation.issues.clone();
        issues.extend(findings.iter().filter(|f| !f.passed).map(|f| {
            Issue::new(Severity::Warning, AUDIT_CATEGORY, &f.message).with_check(&f.check)
        }));

        let passed = findings.iter().all(|f| f.passed);
        tracing::debug!(passed, findings = findings.len(), "Audit complete");

        Ok(AuditResult {
            score: validation.score,
            grade: validation.grade,
            findings,
            issues,
            passed,
        })
    }
}

fn changelog_freshness(
    file: &std::path::Path,
    name: &str,
    today: NaiveDate,
    freshness_days: u32,
) -> AuditFinding {
    let check = "changelog-freshness".to_string();
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(_) => {
            return AuditFinding {
                check,
                passed: false,
                message: format!("{} not found or unreadable", name),
            };
        }
    };

    let Some(newest) = newest_date(&content) else {
        return AuditFinding {
            check,
            passed: false,
            message: format!("{} has no dated entries", name),
        };
    };

    let age = (today - newest).num_days();
    let passed = age <= i64::from(freshness_days);
    AuditFinding {
        check,
        passed,
        message: if passed {
            format!("Newest {} entry ({}) is {} day(s) old", name, newest, age.max(0))
        } else {
            format!(
                "Newest {} entry ({}) is {} days old, older than {} days",
                name, newest, age, freshness_days
            )
        },
    }
}

/// Newest valid `YYYY-MM-DD` date in `content`.
fn newest_date(content: &str) -> Option<NaiveDate> {
    DATE_PATTERN
        .captures_iter(content)
        .filter_map(|caps| {
            let year = caps[1].parse().ok()?;
            let month = caps[2].parse().ok()?;
            let day = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn empty_validation() -> ValidationResult {
        ValidationResult {
            schema: "test".to_string(),
            score: 82.5,
            grade: Grade::B,
            categories: Vec::new(),
            issues: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn newest_date_skips_invalid_dates() {
        let content = "## 2024-02-30\n## 2023-12-01\n## 2024-01-15\n";
        assert_eq!(newest_date(content), Some(date(2024, 1, 15)));
    }

    #[test]
    fn fresh_project_passes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "# x").unwrap();
        fs::write(temp.path().join("CHANGELOG.md"), "## [1.0.0] - 2024-03-01\n").unwrap();
        let ctx = RunContext::new(temp.path()).with_today(date(2024, 4, 1));

        let result = DefaultAuditor
            .audit(&ctx, &empty_validation(), &AuditSettings::default())
            .unwrap();
        assert!(result.passed, "{:?}", result.findings);
        assert_eq!(result.score, 82.5);
        assert_eq!(result.grade, Grade::B);
    }

    #[test]
    fn stale_changelog_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "# x").unwrap();
        fs::write(temp.path().join("CHANGELOG.md"), "## 2023-01-01\n").unwrap();
        let ctx = RunContext::new(temp.path()).with_today(date(2024, 1, 1));

        let result = DefaultAuditor
            .audit(&ctx, &empty_validation(), &AuditSettings::default())
            .unwrap();
        assert!(!result.passed);
        let failed: Vec<_> = result.failed_findings().map(|f| f.check.as_str()).collect();
        assert_eq!(failed, vec!["changelog-freshness"]);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].category, AUDIT_CATEGORY);
    }

    #[test]
    fn missing_required_file_fails() {
        let temp = TempDir::new().unwrap();
        let ctx = RunContext::new(temp.path());
        let result = DefaultAuditor
            .audit(&ctx, &empty_validation(), &AuditSettings::default())
            .unwrap();
        assert!(result
            .findings
            .iter()
            .any(|f| f.check == "required-file:README.md" && !f.passed));
    }

    #[test]
    fn validation_errors_fail_the_audit() {
        let temp = TempDir::new().unwrap();
        let mut validation = empty_validation();
        validation
            .issues
            .push(Issue::new(Severity::Error, "safety", "secrets committed"));
        let settings = AuditSettings {
            required_files: Vec::new(),
            ..AuditSettings::default()
        };
        fs::write(temp.path().join("CHANGELOG.md"), "2024-01-01").unwrap();
        let ctx = RunContext::new(temp.path()).with_today(date(2024, 1, 2));

        let result = DefaultAuditor.audit(&ctx, &validation, &settings).unwrap();
        let failed: Vec<_> = result.failed_findings().map(|f| f.check.as_str()).collect();
        assert_eq!(failed, vec!["validation-errors"]);
    }

    #[test]
    fn escaping_required_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let settings = AuditSettings {
            required_files: vec!["/etc/passwd".to_string()],
            ..AuditSettings::default()
        };
        let err = DefaultAuditor
            .audit(&RunContext::new(temp.path()), &empty_validation(), &settings)
            .unwrap_err();
        assert!(matches!(err, crate::Error::PathBoundary { .. }));
    }
}
