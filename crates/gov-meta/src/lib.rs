//! Configuration and schema metadata for the governance engine.
//!
//! Everything here resolves along the same chain: an explicit override,
//! then the project's own file, then the embedded default. Recoverable
//! problems never become errors; they travel as warnings in [`Resolved`].

pub mod config;
pub mod constitution;
pub mod error;
pub mod loader;
pub mod resolved;
pub mod schema;

pub use config::{
    AuditSettings, EffectiveConfig, ExtractionRule, Standards, SyncSettings, SyncTargetSpec,
    ToolOverrides, TraversalSettings,
};
pub use constitution::{Constitution, ConstitutionSource};
pub use error::{Error, Result};
pub use loader::{CONFIG_DIR, CONFIG_FILE, ConfigLoader};
pub use resolved::Resolved;
pub use schema::{Category, Check, CheckRule, CheckSeverity, SchemaResolver, ValidationSchema};
