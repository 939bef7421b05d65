//! Adapter running a custom tool as a subprocess
//!
//! Each operation runs `entry... <operation>` in the project root. One JSON
//! request object goes to stdin; the typed result is read from stdout.
//! stderr is captured and reported when the tool fails.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use gov_core::{
    AuditResult, Auditor, GovernanceInput, GovernanceStatus, Governor, RunContext, SyncResult,
    Synchronizer, Tool, ValidationResult, Validator,
};
use gov_meta::{AuditSettings, SyncSettings, ValidationSchema};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::manifest::ToolManifest;

/// A custom tool that passed its capability check
#[derive(Debug, Clone)]
pub struct ExternalTool {
    name: String,
    version: String,
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalTool {
    /// Build from a checked manifest and its resolved program.
    pub fn new(manifest: &ToolManifest, program: PathBuf) -> Self {
        Self {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            program,
            args: manifest.args().to_vec(),
        }
    }

    fn invoke<T: DeserializeOwned>(
        &self,
        ctx: &RunContext,
        operation: &str,
        payload: Value,
    ) -> gov_core::Result<T> {
        let mut request = json!({
            "operation": operation,
            "root": ctx.root(),
            "today": ctx.today.to_string(),
        });
        if let (Some(request), Value::Object(payload)) = (request.as_object_mut(), payload) {
            request.extend(payload);
        }
        let body = serde_json::to_vec(&request)?;

        tracing::debug!(
            tool = %self.name,
            operation,
            program = %self.program.display(),
            "Invoking custom tool"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(operation)
            .current_dir(ctx.root())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format!("cannot start {}: {}", self.program.display(), e)))?;

        // stdout is drained while the request is still being written
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || match stdin.write_all(&body) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| self.failure(format!("cannot collect output: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            return Err(self.failure(format!(
                "'{}' exited with code {}: {}",
                operation, code, stderr
            )));
        }

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(self.failure(format!("cannot send request: {}", e))),
                Err(_) => return Err(self.failure("request writer panicked".to_string())),
            }
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| self.failure(format!("invalid '{}' output: {}", operation, e)))
    }

    fn failure(&self, message: String) -> gov_core::Error {
        gov_core::Error::ToolExecution {
            tool: self.name.clone(),
            message,
        }
    }
}

impl Tool for ExternalTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }
}

impl Validator for ExternalTool {
    fn validate(
        &self,
        ctx: &RunContext,
        schema: &ValidationSchema,
    ) -> gov_core::Result<ValidationResult> {
        self.invoke(ctx, "validate", json!({ "schema": schema }))
    }
}

impl Synchronizer for ExternalTool {
    fn preview(&self, ctx: &RunContext, settings: &SyncSettings) -> gov_core::Result<SyncResult> {
        self.invoke(ctx, "preview", json!({ "sync": settings }))
    }

    fn apply(&self, ctx: &RunContext, settings: &SyncSettings) -> gov_core::Result<SyncResult> {
        self.invoke(ctx, "apply", json!({ "sync": settings }))
    }
}

impl Auditor for ExternalTool {
    fn audit(
        &self,
        ctx: &RunContext,
        validation: &ValidationResult,
        settings: &AuditSettings,
    ) -> gov_core::Result<AuditResult> {
        self.invoke(
            ctx,
            "audit",
            json!({ "validation": validation, "audit": settings }),
        )
    }
}

impl Governor for ExternalTool {
    fn govern(
        &self,
        ctx: &RunContext,
        input: &GovernanceInput<'_>,
    ) -> gov_core::Result<GovernanceStatus> {
        self.invoke(ctx, "govern", json!({ "input": input }))
    }
}
