//! Role contracts for pluggable tools
//!
//! Each governance role is a trait. The built-in implementations live in
//! this crate; custom implementations are resolved by `gov-tools`, which
//! checks them against [`Role::operations`] before handing them out.

use gov_meta::{AuditSettings, Constitution, Standards, SyncSettings, ValidationSchema};
use serde::{Deserialize, Serialize};

use crate::audit::AuditResult;
use crate::context::RunContext;
use crate::governor::GovernanceStatus;
use crate::model::ValidationResult;
use crate::sync::SyncResult;
use crate::Result;

/// Accessor capabilities every role requires
pub const ACCESSOR_CAPABILITIES: &[&str] = &["name", "version"];

/// The four governance roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Validator,
    Synchronizer,
    Auditor,
    Governor,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Validator,
        Role::Synchronizer,
        Role::Auditor,
        Role::Governor,
    ];

    /// Primary operations an implementation of this role must expose
    pub fn operations(self) -> &'static [&'static str] {
        match self {
            Self::Validator => &["validate"],
            Self::Synchronizer => &["preview", "apply"],
            Self::Auditor => &["audit"],
            Self::Governor => &["govern"],
        }
    }

    /// Accessors followed by operations, in check order
    pub fn capabilities(self) -> Vec<&'static str> {
        ACCESSOR_CAPABILITIES
            .iter()
            .chain(self.operations())
            .copied()
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validator => "validator",
            Self::Synchronizer => "synchronizer",
            Self::Auditor => "auditor",
            Self::Governor => "governor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a tool is built in or supplied by the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolSource {
    Default,
    Custom,
}

/// Identity of a resolved tool, for tracing results back to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub version: String,
    pub role: Role,
    pub source: ToolSource,
}

impl ToolDescriptor {
    /// Describe `tool` in `role`
    pub fn of<T: Tool + ?Sized>(tool: &T, role: Role, source: ToolSource) -> Self {
        Self {
            name: tool.name().to_string(),
            version: tool.version().to_string(),
            role,
            source,
        }
    }
}

impl std::fmt::Display for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self.source {
            ToolSource::Default => "default",
            ToolSource::Custom => "custom",
        };
        write!(f, "{} {} ({} {})", self.name, self.version, source, self.role)
    }
}

/// Identity accessors shared by every role
pub trait Tool {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
}

/// Scores a project against a schema
pub trait Validator: Tool {
    fn validate(&self, ctx: &RunContext, schema: &ValidationSchema) -> Result<ValidationResult>;
}

/// Reconciles version strings across files
pub trait Synchronizer: Tool {
    /// Report mismatches without writing
    fn preview(&self, ctx: &RunContext, settings: &SyncSettings) -> Result<SyncResult>;

    /// Rewrite mismatches and report what changed
    fn apply(&self, ctx: &RunContext, settings: &SyncSettings) -> Result<SyncResult>;
}

/// Combines validation output with repository metadata checks
pub trait Auditor: Tool {
    fn audit(
        &self,
        ctx: &RunContext,
        validation: &ValidationResult,
        settings: &AuditSettings,
    ) -> Result<AuditResult>;
}

/// Everything a governor decides on
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GovernanceInput<'a> {
    pub constitution: &'a Constitution,
    pub validation: &'a ValidationResult,
    pub audit: &'a AuditResult,
    pub standards: &'a Standards,
}

/// Decides overall compliance
pub trait Governor: Tool {
    fn govern(&self, ctx: &RunContext, input: &GovernanceInput<'_>) -> Result<GovernanceStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_list_accessors_then_operations() {
        assert_eq!(
            Role::Synchronizer.capabilities(),
            vec!["name", "version", "preview", "apply"]
        );
        assert_eq!(Role::Validator.capabilities(), vec!["name", "version", "validate"]);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Governor).unwrap(), "\"governor\"");
        assert_eq!(Role::Auditor.to_string(), "auditor");
    }
}
