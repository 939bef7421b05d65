//! Locates and parses the project configuration file
//!
//! Resolution order:
//!
//! 1. An explicit path supplied by the caller
//! 2. `<project>/.governance/config.json`
//! 3. Nothing: the caller runs with all defaults
//!
//! The loader never fails. A malformed file degrades to defaults with a
//! warning so a broken override cannot block validation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::EffectiveConfig;
use crate::resolved::Resolved;

/// Directory holding governance files inside a project
pub const CONFIG_DIR: &str = ".governance";

/// Configuration file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.json";

/// Pure loader for the project-level configuration object
pub struct ConfigLoader;

impl ConfigLoader {
    /// Conventional config location for a project
    pub fn conventional_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load the project's own configuration.
    ///
    /// Returns `None` when the file is absent or malformed.
    pub fn load(project_root: &Path) -> Option<EffectiveConfig> {
        Self::load_from(project_root, None).value
    }

    /// Load configuration, preferring `explicit` over the conventional file.
    ///
    /// Absence of the conventional file is silent; absence of an explicitly
    /// requested file, an unreadable file or unparseable JSON each fall back
    /// to `None` with a warning.
    pub fn load_from(
        project_root: &Path,
        explicit: Option<&Path>,
    ) -> Resolved<Option<EffectiveConfig>> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Resolved::fallback(
                        None,
                        format!(
                            "Config file {} not found; using defaults",
                            path.display()
                        ),
                    );
                }
                path.to_path_buf()
            }
            None => {
                let path = Self::conventional_path(project_root);
                if !path.is_file() {
                    tracing::debug!(?path, "No project config found; using defaults");
                    return Resolved::clean(None);
                }
                path
            }
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                return Resolved::fallback(
                    None,
                    format!(
                        "Config file {} is unreadable ({}); using defaults",
                        path.display(),
                        e
                    ),
                );
            }
        };

        match EffectiveConfig::parse(&content) {
            Ok(config) => {
                tracing::debug!(?path, "Loaded project config");
                Resolved::clean(Some(config))
            }
            Err(e) => Resolved::fallback(
                None,
                format!(
                    "Config file {} is malformed ({}); using defaults",
                    path.display(),
                    e
                ),
            ),
        }
    }
}
