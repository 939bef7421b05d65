//! Validation schema model
//!
//! A schema is a set of weighted categories, each holding ordered checks.
//! Category weights must sum to 100 so that the total score is bounded by
//! construction.

mod resolver;

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use resolver::{SchemaResolver, apply_standards};

/// Allowed deviation of the weight sum from 100
pub const WEIGHT_TOLERANCE: f64 = 0.01;

const DEFAULT_SCHEMA_JSON: &str = include_str!("default_schema.json");

static DEFAULT_SCHEMA: LazyLock<std::result::Result<ValidationSchema, String>> =
    LazyLock::new(|| {
        let schema: ValidationSchema =
            serde_json::from_str(DEFAULT_SCHEMA_JSON).map_err(|e| e.to_string())?;
        let required: Vec<&str> = schema.required_categories();
        let defects = schema.defects(&required);
        if defects.is_empty() {
            Ok(schema)
        } else {
            Err(defects.join("; "))
        }
    });

/// The embedded default schema, parsed once per process.
pub fn default_schema() -> Result<&'static ValidationSchema> {
    DEFAULT_SCHEMA.as_ref().map_err(|message| Error::DefaultSchema {
        message: message.clone(),
    })
}

fn default_check_weight() -> f64 {
    1.0
}

/// Severity attached to an issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSeverity {
    /// Informational notice
    Info,
    /// Potential problem
    #[default]
    Warning,
    /// Compliance failure
    Error,
}

impl std::fmt::Display for CheckSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Complete validation schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSchema {
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub categories: Vec<Category>,
}

/// A weighted group of checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Share of the total score, out of 100
    pub weight: f64,
    /// Custom schemas must define every required category of the default
    #[serde(default)]
    pub required: bool,
    /// Minimum achievement in percent of `weight`
    #[serde(default)]
    pub minimum: Option<f64>,
    /// Recommendation template; `{checks}` expands to the failed checks
    #[serde(default)]
    pub recommendation: Option<String>,
    pub checks: Vec<Check>,
}

/// One check inside a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub id: String,
    pub description: String,
    /// Relative weight inside the category
    #[serde(default = "default_check_weight")]
    pub weight: f64,
    /// Severity of the issue raised when the check fails outright
    #[serde(default)]
    pub severity: CheckSeverity,
    pub rule: CheckRule,
}

/// What a check inspects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckRule {
    /// A regular file exists
    FileExists { path: String },
    /// At least one of the paths exists, file or directory
    AnyPathExists { paths: Vec<String> },
    /// Every path exists; partial credit for the fraction present
    FilesExist { paths: Vec<String> },
    /// A directory exists
    DirExists { path: String },
    /// A file matches a regex
    FileContains { path: String, pattern: String },
    /// A file has at least `lines` non-blank lines; partial credit by ratio
    MinLines { path: String, lines: usize },
    /// No file with one of the extensions matches the regex
    ForbiddenPattern {
        extensions: Vec<String>,
        pattern: String,
    },
    /// No file anywhere in the tree carries one of the names
    ForbiddenFiles { names: Vec<String> },
}

impl CheckRule {
    /// Regex carried by the rule, if any
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::FileContains { pattern, .. } | Self::ForbiddenPattern { pattern, .. } => {
                Some(pattern)
            }
            _ => None,
        }
    }
}

impl ValidationSchema {
    /// Parse a schema from JSON text without validating it
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Ids of categories marked required
    pub fn required_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|c| c.required)
            .map(|c| c.id.as_str())
            .collect()
    }

    /// Sum of all category weights
    pub fn total_weight(&self) -> f64 {
        self.categories.iter().map(|c| c.weight).sum()
    }

    /// Look up a category by id
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Every structural defect, in a stable order.
    ///
    /// An empty list means the schema is usable as-is.
    pub fn defects(&self, required: &[&str]) -> Vec<String> {
        let mut defects = Vec::new();

        if self.categories.is_empty() {
            defects.push("schema defines no categories".to_string());
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.id.trim().is_empty() {
                defects.push("category with empty id".to_string());
            } else if !seen.insert(category.id.as_str()) {
                defects.push(format!("duplicate category '{}'", category.id));
            }
            if !category.weight.is_finite() || category.weight <= 0.0 {
                defects.push(format!(
                    "category '{}' has invalid weight {}",
                    category.id, category.weight
                ));
            }
            if let Some(minimum) = category.minimum
                && !(0.0..=100.0).contains(&minimum)
            {
                defects.push(format!(
                    "category '{}' minimum {} is outside 0-100",
                    category.id, minimum
                ));
            }
            if category.checks.is_empty() {
                defects.push(format!("category '{}' has no checks", category.id));
            }

            let mut check_ids = HashSet::new();
            for check in &category.checks {
                if !check_ids.insert(check.id.as_str()) {
                    defects.push(format!(
                        "duplicate check '{}' in category '{}'",
                        check.id, category.id
                    ));
                }
                if !check.weight.is_finite() || check.weight <= 0.0 {
                    defects.push(format!(
                        "check '{}.{}' has non-positive weight",
                        category.id, check.id
                    ));
                }
                if let Some(pattern) = check.rule.pattern()
                    && let Err(e) = Regex::new(pattern)
                {
                    defects.push(format!(
                        "check '{}.{}' has invalid pattern: {}",
                        category.id, check.id, e
                    ));
                }
            }
        }

        let total = self.total_weight();
        if (total - 100.0).abs() > WEIGHT_TOLERANCE {
            defects.push(format!("category weights sum to {} instead of 100", total));
        }

        for id in required {
            if self.category(id).is_none() {
                defects.push(format!("required category '{}' is missing", id));
            }
        }

        defects
    }
}
