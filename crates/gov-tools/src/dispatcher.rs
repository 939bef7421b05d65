//! Dispatcher running the governance operations end to end
//!
//! Every call loads the config afresh, resolves the tools it needs before
//! running any of them, and returns the result together with the tools
//! involved and every fallback warning raised on the way.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use gov_core::{
    AuditResult, GovernanceInput, GovernanceStatus, RunContext, SyncResult, ToolDescriptor,
    ValidationResult,
};
use gov_meta::{ConfigLoader, Constitution, EffectiveConfig, SchemaResolver, ValidationSchema};
use serde::Serialize;

use crate::error::Result;
use crate::registry::ToolRegistry;

/// A result plus the tools that produced it and the warnings raised
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<T> {
    /// Tools involved, in execution order
    pub tools: Vec<ToolDescriptor>,
    pub warnings: Vec<String>,
    pub result: T,
}

/// Everything a single operation starts from
struct Run {
    config: Option<EffectiveConfig>,
    warnings: Vec<String>,
    ctx: RunContext,
    registry: ToolRegistry,
}

impl Run {
    fn config(&self) -> Option<&EffectiveConfig> {
        self.config.as_ref()
    }

    fn schema(&mut self) -> Result<ValidationSchema> {
        let (schema, warnings) =
            SchemaResolver::resolve(self.config.as_ref(), self.ctx.root())?.into_parts();
        self.warnings.extend(warnings);
        Ok(schema)
    }
}

/// Runs validate, sync, audit and govern for one project
#[derive(Debug, Clone)]
pub struct Dispatcher {
    root: PathBuf,
    config_path: Option<PathBuf>,
    today: Option<NaiveDate>,
}

impl Dispatcher {
    /// Dispatcher for the project at `root`, anchored to an absolute path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: gov_fs::absolute_root(&root.into()),
            config_path: None,
            today: None,
        }
    }

    /// Read config from `path` instead of the project's conventional file.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Pin the run date used by freshness checks.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn start(&self) -> Run {
        let (config, warnings) =
            ConfigLoader::load_from(&self.root, self.config_path.as_deref()).into_parts();

        let mut ctx = RunContext::new(&self.root);
        if let Some(today) = self.today {
            ctx = ctx.with_today(today);
        }
        if let Some(config) = &config {
            ctx = ctx.with_budget(config.traversal.budget());
        }

        let overrides = config.as_ref().map(|c| c.tools.clone()).unwrap_or_default();
        Run {
            registry: ToolRegistry::new(&self.root, overrides),
            config,
            warnings,
            ctx,
        }
    }

    /// Score the project against the effective schema.
    pub fn validate(&self) -> Result<Report<ValidationResult>> {
        let mut run = self.start();
        let validator = run.registry.resolve_validator()?;
        let schema = run.schema()?;

        let result = validator.tool.validate(&run.ctx, &schema)?;
        Ok(Report {
            tools: vec![validator.descriptor],
            warnings: run.warnings,
            result,
        })
    }

    /// Report version mismatches without writing.
    pub fn preview_sync(&self) -> Result<Report<SyncResult>> {
        self.sync(false)
    }

    /// Rewrite version mismatches.
    pub fn apply_sync(&self) -> Result<Report<SyncResult>> {
        self.sync(true)
    }

    fn sync(&self, apply: bool) -> Result<Report<SyncResult>> {
        let mut run = self.start();
        let synchronizer = run.registry.resolve_synchronizer()?;

        let Some(settings) = run.config().and_then(|c| c.sync.clone()) else {
            let warning = "No sync section configured; nothing to synchronize".to_string();
            tracing::warn!("{}", warning);
            run.warnings.push(warning);
            return Ok(Report {
                tools: vec![synchronizer.descriptor],
                warnings: run.warnings,
                result: SyncResult::default(),
            });
        };

        let result = if apply {
            synchronizer.tool.apply(&run.ctx, &settings)?
        } else {
            synchronizer.tool.preview(&run.ctx, &settings)?
        };
        Ok(Report {
            tools: vec![synchronizer.descriptor],
            warnings: run.warnings,
            result,
        })
    }

    /// Validate, then audit repository metadata.
    pub fn audit(&self) -> Result<Report<AuditResult>> {
        let mut run = self.start();
        let validator = run.registry.resolve_validator()?;
        let auditor = run.registry.resolve_auditor()?;
        let schema = run.schema()?;
        let settings = run.config().map(|c| c.audit.clone()).unwrap_or_default();

        let validation = validator.tool.validate(&run.ctx, &schema)?;
        let result = auditor.tool.audit(&run.ctx, &validation, &settings)?;
        Ok(Report {
            tools: vec![validator.descriptor, auditor.descriptor],
            warnings: run.warnings,
            result,
        })
    }

    /// Validate, audit, then decide compliance under the constitution.
    pub fn govern(&self) -> Result<Report<GovernanceStatus>> {
        let mut run = self.start();
        let validator = run.registry.resolve_validator()?;
        let auditor = run.registry.resolve_auditor()?;
        let governor = run.registry.resolve_governor()?;
        let schema = run.schema()?;

        let (constitution, warnings) =
            Constitution::resolve(run.config(), run.ctx.root()).into_parts();
        run.warnings.extend(warnings);
        let defaults = EffectiveConfig::default();
        let config = run.config().unwrap_or(&defaults);

        let validation = validator.tool.validate(&run.ctx, &schema)?;
        let audit = auditor.tool.audit(&run.ctx, &validation, &config.audit)?;
        let input = GovernanceInput {
            constitution: &constitution,
            validation: &validation,
            audit: &audit,
            standards: &config.standards,
        };
        let result = governor.tool.govern(&run.ctx, &input)?;

        Ok(Report {
            tools: vec![validator.descriptor, auditor.descriptor, governor.descriptor],
            warnings: run.warnings,
            result,
        })
    }
}
