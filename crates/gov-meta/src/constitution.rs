//! Governing constitution document
//!
//! The embedded constitution applies unless the project names its own.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::EffectiveConfig;
use crate::resolved::Resolved;

const DEFAULT_CONSTITUTION: &str = include_str!("default_constitution.md");

/// Where the constitution in effect came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstitutionSource {
    Default,
    Custom,
}

/// The constitution in effect for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constitution {
    pub source: ConstitutionSource,
    /// Project-relative path for custom documents
    pub path: Option<String>,
    /// First markdown heading, or "Untitled"
    pub title: String,
    /// Hex SHA-256 of the document text
    pub fingerprint: String,
}

impl Constitution {
    /// The embedded default constitution
    pub fn embedded() -> Self {
        Self::from_text(ConstitutionSource::Default, None, DEFAULT_CONSTITUTION)
    }

    fn from_text(source: ConstitutionSource, path: Option<String>, text: &str) -> Self {
        let title = text
            .lines()
            .find_map(|line| line.trim().strip_prefix("# "))
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| "Untitled".to_string());
        let fingerprint = format!("{:x}", Sha256::digest(text.as_bytes()));
        Self {
            source,
            path,
            title,
            fingerprint,
        }
    }

    /// Resolve the constitution named by `config`, falling back to the
    /// embedded document with a warning when it cannot be read.
    pub fn resolve(config: Option<&EffectiveConfig>, project_root: &Path) -> Resolved<Self> {
        let Some(reference) = config.and_then(|c| c.constitution.as_deref()) else {
            return Resolved::clean(Self::embedded());
        };

        let text = gov_fs::contained_path(project_root, reference)
            .map_err(|e| e.to_string())
            .and_then(|path| fs::read_to_string(&path).map_err(|e| e.to_string()));

        match text {
            Ok(text) => Resolved::clean(Self::from_text(
                ConstitutionSource::Custom,
                Some(reference.to_string()),
                &text,
            )),
            Err(e) => Resolved::fallback(
                Self::embedded(),
                format!(
                    "Constitution '{}' unavailable ({}); using embedded constitution",
                    reference, e
                ),
            ),
        }
    }
}
