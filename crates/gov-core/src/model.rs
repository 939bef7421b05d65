//! Validation result model

use serde::{Deserialize, Serialize};

use crate::engine::Grade;

/// Issue severity; shared with the schema's check severities
pub use gov_meta::CheckSeverity as Severity;

/// Category used for issues raised by checks that failed to run
pub const INTERNAL_ERROR_CATEGORY: &str = "internal-error";

/// Category used for traversal budget warnings
pub const TRAVERSAL_CATEGORY: &str = "traversal";

/// A single finding produced by a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: String,
    /// Check that produced the issue, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Issue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            check: None,
            message: message.into(),
            location: None,
        }
    }

    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Advice derived from failed or partial checks in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub message: String,
    /// Ids of the checks this recommendation addresses
    pub checks: Vec<String>,
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: String,
    /// Credit earned, 0.0 to 1.0
    pub credit: f64,
    /// False when the check could not run
    pub executed: bool,
}

/// Score achieved in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub id: String,
    pub weight: f64,
    /// Points earned out of `weight`
    pub score: f64,
    /// Share of `weight` earned, in percent
    pub percent: f64,
    pub checks: Vec<CheckResult>,
}

/// Result of validating a project against a schema
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Name of the schema that was applied
    pub schema: String,
    /// Total score, 0 to 100
    pub score: f64,
    pub grade: Grade,
    pub categories: Vec<CategoryScore>,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
}

impl ValidationResult {
    /// Issues at or above `severity`
    pub fn issues_at_least(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity >= severity)
    }

    /// Score of one category
    pub fn category(&self, id: &str) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.id == id)
    }
}
