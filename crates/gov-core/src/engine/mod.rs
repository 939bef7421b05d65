//! Validation engine: the built-in validator
//!
//! Checks run one at a time in schema order. Each check is isolated: an
//! error or panic inside it becomes an `internal-error` issue and the check
//! earns no credit, while the rest of the run continues. Scores are rounded
//! to two decimals so identical inputs serialize identically.

mod checks;
mod grade;

use std::panic::{self, AssertUnwindSafe};

use gov_fs::ProjectTree;
use gov_meta::{Category, Check, ValidationSchema};

pub use checks::{Outcome, evaluate};
pub use grade::Grade;

use crate::context::RunContext;
use crate::model::{
    CategoryScore, CheckResult, INTERNAL_ERROR_CATEGORY, Issue, Recommendation, Severity,
    TRAVERSAL_CATEGORY, ValidationResult,
};
use crate::roles::{Tool, Validator};
use crate::Result;

const CHECKS_PLACEHOLDER: &str = "{checks}";

/// The built-in validator
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    pub const NAME: &'static str = "default-validator";

    pub fn new() -> Self {
        Self
    }

    /// Validate the project at `ctx.root` against `schema`.
    ///
    /// Fails only when the project root cannot be traversed at all.
    pub fn run(&self, ctx: &RunContext, schema: &ValidationSchema) -> Result<ValidationResult> {
        let tree = ProjectTree::scan(ctx.root(), ctx.budget)?;
        let mut issues = Vec::new();

        if let Some(reason) = tree.truncation() {
            issues.push(Issue::new(
                Severity::Warning,
                TRAVERSAL_CATEGORY,
                format!("Project traversal stopped early ({}); results may be incomplete", reason),
            ));
        }

        let mut categories = Vec::with_capacity(schema.categories.len());
        let mut recommendations = Vec::new();

        for category in &schema.categories {
            let scored = score_category(category, &tree);
            issues.extend(scored.issues);
            recommendations.extend(scored.recommendation);
            categories.push(scored.score);
        }

        let total: f64 = categories.iter().map(|c| c.score).sum();
        let score = round2(total).clamp(0.0, 100.0);

        tracing::debug!(schema = %schema.name, score, "Validation complete");

        Ok(ValidationResult {
            schema: schema.name.clone(),
            score,
            grade: Grade::from_score(score),
            categories,
            issues,
            recommendations,
        })
    }
}

impl Tool for ValidationEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }
}

impl Validator for ValidationEngine {
    fn validate(&self, ctx: &RunContext, schema: &ValidationSchema) -> Result<ValidationResult> {
        self.run(ctx, schema)
    }
}

struct ScoredCategory {
    score: CategoryScore,
    issues: Vec<Issue>,
    recommendation: Option<Recommendation>,
}

fn score_category(category: &Category, tree: &ProjectTree) -> ScoredCategory {
    let mut issues = Vec::new();
    let mut results = Vec::with_capacity(category.checks.len());
    let mut unmet: Vec<&Check> = Vec::new();
    let mut earned = 0.0;
    let mut possible = 0.0;

    for check in &category.checks {
        possible += check.weight;
        match run_isolated(check, tree) {
            Ok(outcome) => {
                earned += check.weight * outcome.credit;
                if outcome.credit < 1.0 {
                    unmet.push(check);
                    issues.push(issue_for(category, check, &outcome));
                }
                results.push(CheckResult {
                    id: check.id.clone(),
                    credit: round2(outcome.credit),
                    executed: true,
                });
            }
            Err(message) => {
                tracing::warn!(check = %check.id, "Check failed to run: {}", message);
                issues.push(
                    Issue::new(
                        Severity::Error,
                        INTERNAL_ERROR_CATEGORY,
                        format!(
                            "Check '{}.{}' failed to run: {}",
                            category.id, check.id, message
                        ),
                    )
                    .with_check(check.id.clone()),
                );
                results.push(CheckResult {
                    id: check.id.clone(),
                    credit: 0.0,
                    executed: false,
                });
            }
        }
    }

    let fraction = if possible > 0.0 { earned / possible } else { 0.0 };
    let percent = round2(fraction * 100.0);

    if let Some(minimum) = category.minimum
        && percent < minimum
    {
        issues.push(Issue::new(
            Severity::Warning,
            category.id.clone(),
            format!(
                "Category '{}' achieved {}% which is below its minimum of {}%",
                category.id, percent, minimum
            ),
        ));
    }

    ScoredCategory {
        score: CategoryScore {
            id: category.id.clone(),
            weight: category.weight,
            score: round2(category.weight * fraction),
            percent,
            checks: results,
        },
        issues,
        recommendation: recommend(category, &unmet),
    }
}

/// Run one check, converting both errors and panics into a message.
fn run_isolated(check: &Check, tree: &ProjectTree) -> std::result::Result<Outcome, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| evaluate(&check.rule, tree))) {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

fn issue_for(category: &Category, check: &Check, outcome: &Outcome) -> Issue {
    // Partial credit softens the finding by one level
    let severity = if outcome.credit > 0.0 {
        match check.severity {
            Severity::Error => Severity::Warning,
            _ => Severity::Info,
        }
    } else {
        check.severity
    };

    let message = match &outcome.detail {
        Some(detail) => format!("{}: {}", check.description, detail),
        None => format!("{}: not satisfied", check.description),
    };

    let issue = Issue::new(severity, category.id.clone(), message).with_check(check.id.clone());
    match &outcome.location {
        Some(location) => issue.with_location(location.clone()),
        None => issue,
    }
}

/// One recommendation per category, covering every unmet check in it.
fn recommend(category: &Category, unmet: &[&Check]) -> Option<Recommendation> {
    if unmet.is_empty() {
        return None;
    }

    let descriptions: Vec<&str> = unmet.iter().map(|c| c.description.as_str()).collect();
    let joined = descriptions.join("; ");
    let message = match &category.recommendation {
        Some(template) if template.contains(CHECKS_PLACEHOLDER) => {
            template.replace(CHECKS_PLACEHOLDER, &joined)
        }
        Some(template) => format!("{} ({})", template, joined),
        None => {
            let title = if category.title.is_empty() {
                &category.id
            } else {
                &category.title
            };
            format!("Improve {}: {}.", title.to_lowercase(), joined)
        }
    };

    Some(Recommendation {
        category: category.id.clone(),
        message,
        checks: unmet.iter().map(|c| c.id.clone()).collect(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use gov_meta::{CheckRule, CheckSeverity};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn check(id: &str, weight: f64, rule: CheckRule) -> Check {
        Check {
            id: id.to_string(),
            description: format!("{} holds", id),
            weight,
            severity: CheckSeverity::Error,
            rule,
        }
    }

    fn schema(categories: Vec<Category>) -> ValidationSchema {
        ValidationSchema {
            name: "test".to_string(),
            version: "1".to_string(),
            categories,
        }
    }

    fn category(id: &str, weight: f64, checks: Vec<Check>) -> Category {
        Category {
            id: id.to_string(),
            title: String::new(),
            weight,
            required: false,
            minimum: None,
            recommendation: Some("Fix: {checks}.".to_string()),
            checks,
        }
    }

    fn file_exists(path: &str) -> CheckRule {
        CheckRule::FileExists {
            path: path.to_string(),
        }
    }

    #[test]
    fn category_score_scales_to_weight() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "").unwrap();

        let schema = schema(vec![
            category(
                "docs",
                60.0,
                vec![check("a", 3.0, file_exists("a")), check("b", 1.0, file_exists("b"))],
            ),
            category("safety", 40.0, vec![check("c", 1.0, file_exists("a"))]),
        ]);

        let result = ValidationEngine::new()
            .run(&RunContext::new(temp.path()), &schema)
            .unwrap();
        assert_eq!(result.category("docs").unwrap().score, 45.0);
        assert_eq!(result.category("docs").unwrap().percent, 75.0);
        assert_eq!(result.category("safety").unwrap().score, 40.0);
        assert_eq!(result.score, 85.0);
        assert_eq!(result.grade, Grade::B);
    }

    #[test]
    fn failing_checks_in_one_category_share_a_recommendation() {
        let temp = TempDir::new().unwrap();
        let schema = schema(vec![category(
            "docs",
            100.0,
            vec![check("a", 1.0, file_exists("a")), check("b", 1.0, file_exists("b"))],
        )]);

        let result = ValidationEngine::new()
            .run(&RunContext::new(temp.path()), &schema)
            .unwrap();
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].message, "Fix: a holds; b holds.");
        assert_eq!(result.recommendations[0].checks, vec!["a", "b"]);
        assert_eq!(result.issues.len(), 2);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.grade, Grade::F);
    }

    #[test]
    fn broken_check_is_isolated() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "").unwrap();
        let schema = schema(vec![category(
            "docs",
            100.0,
            vec![
                check("escapes", 1.0, file_exists("../../outside")),
                check("a", 1.0, file_exists("a")),
            ],
        )]);

        let result = ValidationEngine::new()
            .run(&RunContext::new(temp.path()), &schema)
            .unwrap();
        let internal: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.category == INTERNAL_ERROR_CATEGORY)
            .collect();
        assert_eq!(internal.len(), 1);
        assert_eq!(internal[0].severity, Severity::Error);
        assert!(internal[0].message.contains("escapes"));
        assert_eq!(result.score, 50.0);
        assert!(!result.category("docs").unwrap().checks[0].executed);
    }

    #[test]
    fn partial_credit_softens_severity() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "").unwrap();
        let schema = schema(vec![category(
            "docs",
            100.0,
            vec![check(
                "both",
                1.0,
                CheckRule::FilesExist {
                    paths: vec!["a".into(), "b".into()],
                },
            )],
        )]);

        let result = ValidationEngine::new()
            .run(&RunContext::new(temp.path()), &schema)
            .unwrap();
        assert_eq!(result.issues[0].severity, Severity::Warning);
        assert_eq!(result.issues[0].location.as_deref(), Some("b"));
        assert_eq!(result.score, 50.0);
    }

    #[test]
    fn category_below_minimum_raises_warning() {
        let temp = TempDir::new().unwrap();
        let mut docs = category("docs", 100.0, vec![check("a", 1.0, file_exists("a"))]);
        docs.minimum = Some(50.0);

        let result = ValidationEngine::new()
            .run(&RunContext::new(temp.path()), &schema(vec![docs]))
            .unwrap();
        assert!(result
            .issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.contains("below its minimum")));
    }

    #[test]
    fn template_without_placeholder_appends_checks() {
        let mut docs = category("docs", 100.0, vec![check("a", 1.0, file_exists("a"))]);
        docs.recommendation = Some("Write docs".to_string());
        let unmet: Vec<&Check> = docs.checks.iter().collect();
        let rec = recommend(&docs, &unmet).unwrap();
        assert_eq!(rec.message, "Write docs (a holds)");
    }
}
