//! Tool registry: built-in defaults and project-supplied overrides
//!
//! Every role always has a built-in implementation. When the project config
//! names a manifest for a role, that custom tool is used instead, but only
//! after it passes the capability check. A custom tool that fails the check
//! stops the run; the registry never substitutes the default for it.

use std::path::{Path, PathBuf};

use gov_core::{
    Auditor, DefaultAuditor, DefaultGovernor, Governor, Role, Synchronizer, Tool, ToolDescriptor,
    ToolSource, ValidationEngine, Validator, VersionSynchronizer,
};
use gov_meta::ToolOverrides;

use crate::error::Result;
use crate::plugin::{ExternalTool, ToolManifest};

/// A resolved tool and its identity
pub struct Resolution<T: ?Sized> {
    pub descriptor: ToolDescriptor,
    pub tool: Box<T>,
}

impl<T: ?Sized + Tool> Resolution<T> {
    fn new(role: Role, source: ToolSource, tool: Box<T>) -> Self {
        let descriptor = ToolDescriptor::of(&*tool, role, source);
        tracing::debug!(%descriptor, "Resolved tool");
        Self { descriptor, tool }
    }
}

impl<T: ?Sized> std::fmt::Debug for Resolution<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolution")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Resolves one implementation per role for a project
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    root: PathBuf,
    overrides: ToolOverrides,
}

impl ToolRegistry {
    pub fn new(root: impl Into<PathBuf>, overrides: ToolOverrides) -> Self {
        Self {
            root: gov_fs::absolute_root(&root.into()),
            overrides,
        }
    }

    /// Registry that only hands out built-in tools
    pub fn builtin(root: impl Into<PathBuf>) -> Self {
        Self::new(root, ToolOverrides::default())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Manifest reference configured for `role`, if any
    pub fn reference(&self, role: Role) -> Option<&str> {
        let reference = match role {
            Role::Validator => &self.overrides.validator,
            Role::Synchronizer => &self.overrides.synchronizer,
            Role::Auditor => &self.overrides.auditor,
            Role::Governor => &self.overrides.governor,
        };
        reference.as_deref()
    }

    pub fn resolve_validator(&self) -> Result<Resolution<dyn Validator>> {
        let role = Role::Validator;
        let custom = self.load_custom(role)?;
        let source = source_of(&custom);
        let tool: Box<dyn Validator> = match custom {
            Some(custom) => Box::new(custom),
            None => Box::new(ValidationEngine::new()),
        };
        Ok(Resolution::new(role, source, tool))
    }

    pub fn resolve_synchronizer(&self) -> Result<Resolution<dyn Synchronizer>> {
        let role = Role::Synchronizer;
        let custom = self.load_custom(role)?;
        let source = source_of(&custom);
        let tool: Box<dyn Synchronizer> = match custom {
            Some(custom) => Box::new(custom),
            None => Box::new(VersionSynchronizer::new()),
        };
        Ok(Resolution::new(role, source, tool))
    }

    pub fn resolve_auditor(&self) -> Result<Resolution<dyn Auditor>> {
        let role = Role::Auditor;
        let custom = self.load_custom(role)?;
        let source = source_of(&custom);
        let tool: Box<dyn Auditor> = match custom {
            Some(custom) => Box::new(custom),
            None => Box::new(DefaultAuditor::new()),
        };
        Ok(Resolution::new(role, source, tool))
    }

    pub fn resolve_governor(&self) -> Result<Resolution<dyn Governor>> {
        let role = Role::Governor;
        let custom = self.load_custom(role)?;
        let source = source_of(&custom);
        let tool: Box<dyn Governor> = match custom {
            Some(custom) => Box::new(custom),
            None => Box::new(DefaultGovernor::new()),
        };
        Ok(Resolution::new(role, source, tool))
    }

    /// Load and capability-check the custom tool for `role`.
    fn load_custom(&self, role: Role) -> Result<Option<ExternalTool>> {
        let Some(reference) = self.reference(role) else {
            return Ok(None);
        };
        tracing::debug!(%role, reference, "Loading custom tool");

        let manifest = ToolManifest::load(&self.root, reference, role)?;
        let program = manifest.check_capabilities(role, reference, &self.root)?;
        Ok(Some(ExternalTool::new(&manifest, program)))
    }
}

fn source_of(custom: &Option<ExternalTool>) -> ToolSource {
    if custom.is_some() {
        ToolSource::Custom
    } else {
        ToolSource::Default
    }
}
