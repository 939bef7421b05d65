//! Default governor

use gov_meta::Constitution;
use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::engine::Grade;
use crate::roles::{GovernanceInput, Governor, Tool};
use crate::Result;

/// Overall compliance decision for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceStatus {
    /// Constitution the decision was made under
    pub constitution: Constitution,
    pub score: f64,
    pub grade: Grade,
    /// Score required for compliance
    pub minimum_score: f64,
    pub compliant: bool,
    /// Reasons the project is not compliant; empty when compliant
    pub blocking: Vec<String>,
    pub audit_passed: bool,
}

/// The built-in governor
///
/// A project is compliant when its validation score reaches the configured
/// minimum and every audit finding passed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGovernor;

impl DefaultGovernor {
    pub const NAME: &'static str = "default-governor";

    pub fn new() -> Self {
        Self
    }
}

impl Tool for DefaultGovernor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }
}

impl Governor for DefaultGovernor {
    fn govern(&self, _ctx: &RunContext, input: &GovernanceInput<'_>) -> Result<GovernanceStatus> {
        let score = input.validation.score;
        let minimum_score = input.standards.minimum_score;
        let mut blocking = Vec::new();

        if score < minimum_score {
            blocking.push(format!(
                "Score {} is below the minimum of {}",
                score, minimum_score
            ));
        }
        for finding in input.audit.failed_findings() {
            blocking.push(format!("Audit check '{}' failed: {}", finding.check, finding.message));
        }

        let compliant = blocking.is_empty();
        tracing::debug!(compliant, score, minimum_score, "Governance decided");

        Ok(GovernanceStatus {
            constitution: input.constitution.clone(),
            score,
            grade: input.validation.grade,
            minimum_score,
            compliant,
            blocking,
            audit_passed: input.audit.passed,
        })
    }
}
