//! Custom tool manifests
//!
//! A project replaces a role's built-in tool by pointing the config at a
//! JSON manifest:
//!
//! ```json
//! {
//!   "name": "strict-validator",
//!   "version": "0.2.0",
//!   "role": "validator",
//!   "entry": ["scripts/validate.sh", "--strict"],
//!   "operations": ["validate"]
//! }
//! ```
//!
//! The manifest is checked against the role contract before the tool is
//! used. Nothing is executed at load time.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use gov_core::Role;
use gov_fs::contained_path;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Manifest describing a custom tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolManifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub role: Role,
    /// Program followed by fixed arguments
    #[serde(default)]
    pub entry: Vec<String>,
    /// Operations the tool implements
    #[serde(default)]
    pub operations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolManifest {
    /// Read and parse the manifest at project-relative `reference`.
    ///
    /// An escaping reference is a path-boundary error; an unreadable or
    /// unparseable file is a load error for `role`.
    pub fn load(project_root: &Path, reference: &str, role: Role) -> Result<Self> {
        let path = contained_path(project_root, reference)?;
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::load(role, reference, format!("cannot read manifest: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::load(role, reference, format!("malformed manifest: {}", e)))
    }

    /// Verify the manifest satisfies `role` and resolve its program.
    ///
    /// Checks, in order: declared role, the `name` and `version` accessors,
    /// every role operation, then the entry program.
    pub fn check_capabilities(
        &self,
        role: Role,
        reference: &str,
        project_root: &Path,
    ) -> Result<PathBuf> {
        if self.role != role {
            return Err(Error::load(
                role,
                reference,
                format!("manifest declares role '{}'", self.role),
            ));
        }

        for capability in role.capabilities() {
            if !self.provides(capability) {
                return Err(missing(role, reference, capability));
            }
        }

        let Some(program) = self.entry.first().filter(|p| !p.trim().is_empty()) else {
            return Err(Error::load(role, reference, "entry is empty"));
        };
        resolve_program(project_root, program)?.ok_or_else(|| {
            Error::load(role, reference, format!("entry program '{}' not found", program))
        })
    }

    /// Accessors count when non-blank; operations when listed.
    fn provides(&self, capability: &str) -> bool {
        match capability {
            "name" => !self.name.trim().is_empty(),
            "version" => !self.version.trim().is_empty(),
            operation => self.operations.iter().any(|op| op == operation),
        }
    }

    /// Fixed arguments following the program
    pub fn args(&self) -> &[String] {
        self.entry.get(1..).unwrap_or_default()
    }
}

fn missing(role: Role, reference: &str, capability: &str) -> Error {
    Error::MissingCapability {
        role,
        module: reference.to_string(),
        capability: capability.to_string(),
    }
}

/// Path-like programs resolve under the project root; bare names on `PATH`.
fn resolve_program(project_root: &Path, program: &str) -> Result<Option<PathBuf>> {
    if program.contains('/') || program.contains('\\') {
        let path = contained_path(project_root, program)?;
        Ok(path.is_file().then_some(path))
    } else {
        Ok(search_path(program))
    }
}

fn search_path(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{}.exe", program));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    fn manifest(role: Role, operations: &[&str]) -> ToolManifest {
        ToolManifest {
            name: "custom".to_string(),
            version: "0.1.0".to_string(),
            role,
            entry: vec!["bin/tool".to_string()],
            operations: operations.iter().map(|s| s.to_string()).collect(),
            description: None,
        }
    }

    fn project_with_program() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("bin")).unwrap();
        fs::write(temp.path().join("bin/tool"), "").unwrap();
        temp
    }

    #[test]
    fn complete_manifest_resolves_program() {
        let temp = project_with_program();
        let program = manifest(Role::Synchronizer, &["preview", "apply"])
            .check_capabilities(Role::Synchronizer, "tool.json", temp.path())
            .unwrap();
        assert_eq!(program, temp.path().join("bin/tool"));
    }

    #[rstest]
    #[case::validator(Role::Validator, &[], "validate")]
    #[case::synchronizer_without_apply(Role::Synchronizer, &["preview"], "apply")]
    #[case::auditor(Role::Auditor, &["validate"], "audit")]
    #[case::governor(Role::Governor, &["audit"], "govern")]
    fn missing_operation_is_named(
        #[case] role: Role,
        #[case] operations: &[&str],
        #[case] expected: &str,
    ) {
        let temp = project_with_program();
        let err = manifest(role, operations)
            .check_capabilities(role, "tool.json", temp.path())
            .unwrap_err();
        match err {
            Error::MissingCapability { capability, .. } => assert_eq!(capability, expected),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_version_is_a_missing_accessor() {
        let temp = project_with_program();
        let mut m = manifest(Role::Validator, &["validate"]);
        m.version = " ".to_string();
        let err = m
            .check_capabilities(Role::Validator, "tool.json", temp.path())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingCapability { ref capability, .. } if capability == "version"
        ));
    }

    #[test]
    fn accessors_are_checked_before_operations() {
        let temp = project_with_program();
        let mut m = manifest(Role::Governor, &[]);
        m.name = String::new();
        let err = m
            .check_capabilities(Role::Governor, "tool.json", temp.path())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingCapability { ref capability, .. } if capability == "name"
        ));
    }

    #[test]
    fn role_mismatch_is_a_load_error() {
        let temp = project_with_program();
        let err = manifest(Role::Auditor, &["audit"])
            .check_capabilities(Role::Validator, "tool.json", temp.path())
            .unwrap_err();
        assert!(matches!(err, Error::ToolLoad { .. }));
        assert!(err.to_string().contains("auditor"));
    }

    #[test]
    fn absent_program_is_a_load_error() {
        let temp = TempDir::new().unwrap();
        let err = manifest(Role::Validator, &["validate"])
            .check_capabilities(Role::Validator, "tool.json", temp.path())
            .unwrap_err();
        assert!(matches!(err, Error::ToolLoad { ref module, .. } if module == "tool.json"));
    }

    #[test]
    fn escaping_program_is_a_boundary_error() {
        let temp = TempDir::new().unwrap();
        let mut m = manifest(Role::Validator, &["validate"]);
        m.entry = vec!["../bin/tool".to_string()];
        let err = m
            .check_capabilities(Role::Validator, "tool.json", temp.path())
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::PathBoundary);
    }

    #[test]
    fn malformed_manifest_is_a_load_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tool.json"), "{ not json").unwrap();
        let err = ToolManifest::load(temp.path(), "tool.json", Role::Validator).unwrap_err();
        assert!(matches!(err, Error::ToolLoad { .. }));
    }

    #[test]
    fn args_follow_program() {
        let mut m = manifest(Role::Validator, &["validate"]);
        m.entry.push("--strict".to_string());
        assert_eq!(m.args(), ["--strict".to_string()]);
    }
}
