//! Core engines for the governance engine
//!
//! This crate implements the built-in tool for each governance role:
//!
//! - **Validator**: [`ValidationEngine`] scores a project against a schema
//! - **Synchronizer**: [`VersionSynchronizer`] keeps version strings in step
//! - **Auditor**: [`DefaultAuditor`] adds repository metadata checks
//! - **Governor**: [`DefaultGovernor`] decides overall compliance
//!
//! # Architecture
//!
//! ```text
//!              gov-cli
//!                 |
//!             gov-tools   (registry, custom tools, dispatcher)
//!                 |
//!             gov-core    (role traits, engines, result model)
//!                 |
//!         +-------+-------+
//!         |               |
//!      gov-meta        gov-fs
//! ```

pub mod audit;
pub mod context;
pub mod engine;
pub mod error;
pub mod governor;
pub mod model;
pub mod roles;
pub mod sync;

pub use audit::{AuditFinding, AuditResult, DefaultAuditor};
pub use context::RunContext;
pub use engine::{Grade, ValidationEngine};
pub use error::{Error, Result};
pub use governor::{DefaultGovernor, GovernanceStatus};
pub use model::{CategoryScore, CheckResult, Issue, Recommendation, Severity, ValidationResult};
pub use roles::{
    Auditor, GovernanceInput, Governor, Role, Synchronizer, Tool, ToolDescriptor, ToolSource,
    Validator,
};
pub use sync::{SyncChange, SyncResult, SyncTarget, VersionSynchronizer};
