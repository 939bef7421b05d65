//! Project configuration model parsed from `.governance/config.json`
//!
//! Every field is optional. A missing field means "use the default" for the
//! component that consumes it; references to other files are kept verbatim
//! and only checked by that consumer.

use std::collections::BTreeMap;

use gov_fs::TraversalBudget;
use serde::{Deserialize, Serialize};

fn default_minimum_score() -> f64 {
    70.0
}

fn default_required_files() -> Vec<String> {
    vec!["README.md".to_string(), "CHANGELOG.md".to_string()]
}

fn default_changelog() -> String {
    "CHANGELOG.md".to_string()
}

fn default_freshness_days() -> u32 {
    90
}

/// Resolved, read-only configuration for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Project-relative path to a custom constitution document
    #[serde(default)]
    pub constitution: Option<String>,

    /// Project-relative path to a custom validation schema
    #[serde(default)]
    pub schema: Option<String>,

    /// Custom tool manifests per role
    #[serde(default)]
    pub tools: ToolOverrides,

    /// Category weight and threshold overrides
    #[serde(default)]
    pub standards: Standards,

    /// Version synchronization targets
    #[serde(default)]
    pub sync: Option<SyncSettings>,

    /// Repository metadata checks for audits
    #[serde(default)]
    pub audit: AuditSettings,

    /// Limits for project traversal
    #[serde(default)]
    pub traversal: TraversalSettings,
}

impl EffectiveConfig {
    /// Parse a configuration object from JSON text
    pub fn parse(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Project-relative manifest paths for custom tools, one per role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOverrides {
    #[serde(default)]
    pub validator: Option<String>,
    #[serde(default)]
    pub synchronizer: Option<String>,
    #[serde(default)]
    pub auditor: Option<String>,
    #[serde(default)]
    pub governor: Option<String>,
}

/// Standards overrides applied on top of the resolved schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standards {
    /// Replacement weights keyed by category id
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,

    /// Minimum achievement per category, in percent of its weight
    #[serde(default)]
    pub minimums: BTreeMap<String, f64>,

    /// Score a project needs to be considered compliant
    #[serde(default = "default_minimum_score")]
    pub minimum_score: f64,
}

impl Default for Standards {
    fn default() -> Self {
        Self {
            weights: BTreeMap::new(),
            minimums: BTreeMap::new(),
            minimum_score: default_minimum_score(),
        }
    }
}

/// How to locate a version substring inside a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRule {
    /// Project-relative file path
    pub path: String,

    /// Regex whose first capture group is the version; semver if absent
    #[serde(default)]
    pub pattern: Option<String>,
}

/// A file kept in step with the canonical version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTargetSpec {
    #[serde(flatten)]
    pub rule: ExtractionRule,

    /// Rewrite every occurrence instead of the first one only
    #[serde(default)]
    pub all: bool,
}

/// Canonical version source and the targets compared against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    pub canonical: ExtractionRule,

    #[serde(default)]
    pub targets: Vec<SyncTargetSpec>,
}

/// Repository metadata checks performed by the auditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSettings {
    #[serde(default = "default_required_files")]
    pub required_files: Vec<String>,

    #[serde(default = "default_changelog")]
    pub changelog: String,

    /// Age in days beyond which the newest changelog entry is stale
    #[serde(default = "default_freshness_days")]
    pub freshness_days: u32,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            required_files: default_required_files(),
            changelog: default_changelog(),
            freshness_days: default_freshness_days(),
        }
    }
}

/// Traversal limits as written in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalSettings {
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub max_files: Option<usize>,
}

impl TraversalSettings {
    /// Merge onto the built-in budget.
    pub fn budget(&self) -> TraversalBudget {
        let defaults = TraversalBudget::default();
        TraversalBudget {
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            max_files: self.max_files.unwrap_or(defaults.max_files),
        }
    }
}
