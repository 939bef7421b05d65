//! Per-run execution context

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use gov_fs::TraversalBudget;

/// Everything a tool needs to know about the run it belongs to.
///
/// Constructed fresh per invocation and never shared between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Absolute project root being governed
    pub root: PathBuf,
    /// Date used for freshness heuristics
    pub today: NaiveDate,
    /// Traversal limits for tree scans
    pub budget: TraversalBudget,
}

impl RunContext {
    /// Context for `root` dated today (UTC) with the default budget.
    ///
    /// The root is made absolute so tools that change directory still see it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: gov_fs::absolute_root(&root.into()),
            today: Utc::now().date_naive(),
            budget: TraversalBudget::default(),
        }
    }

    /// Pin the run date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Override the traversal budget.
    pub fn with_budget(mut self, budget: TraversalBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
