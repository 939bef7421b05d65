//! Produces the effective validation schema
//!
//! A custom schema is accepted wholesale or rejected wholesale. Any defect
//! (unreadable, malformed, bad weight sum, missing required category) falls
//! back to the embedded default in full; there is no partial merge.

use std::fs;
use std::path::Path;

use super::{ValidationSchema, WEIGHT_TOLERANCE, default_schema};
use crate::config::{EffectiveConfig, Standards};
use crate::resolved::Resolved;
use crate::Result;

/// Resolves the schema for one run
pub struct SchemaResolver;

impl SchemaResolver {
    /// Resolve the effective schema, then apply standards overrides.
    ///
    /// Only fails if the embedded default schema itself is broken.
    pub fn resolve(
        config: Option<&EffectiveConfig>,
        project_root: &Path,
    ) -> Result<Resolved<ValidationSchema>> {
        let default = default_schema()?;

        let base = match config.and_then(|c| c.schema.as_deref()) {
            None => Resolved::clean(default.clone()),
            Some(reference) => Self::load_custom(reference, project_root, default),
        };

        Ok(match config {
            Some(config) => {
                let (schema, mut warnings) = base.into_parts();
                let applied = apply_standards(schema, &config.standards);
                warnings.extend(applied.warnings);
                Resolved {
                    value: applied.value,
                    warnings,
                }
            }
            None => base,
        })
    }

    fn load_custom(
        reference: &str,
        project_root: &Path,
        default: &ValidationSchema,
    ) -> Resolved<ValidationSchema> {
        let reject = |defect: String| {
            Resolved::fallback(
                default.clone(),
                format!(
                    "Custom schema '{}' rejected: {}; using default schema",
                    reference, defect
                ),
            )
        };

        let path = match gov_fs::contained_path(project_root, reference) {
            Ok(path) => path,
            Err(e) => return reject(e.to_string()),
        };
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => return reject(format!("cannot read {} ({})", path.display(), e)),
        };
        let schema = match ValidationSchema::parse(&content) {
            Ok(schema) => schema,
            Err(e) => return reject(format!("malformed JSON ({})", e)),
        };

        let required = default.required_categories();
        let defects = schema.defects(&required);
        if !defects.is_empty() {
            return reject(defects.join("; "));
        }

        tracing::debug!(schema = %schema.name, "Using custom schema");
        Resolved::clean(schema)
    }
}

/// Apply category weight and minimum overrides to a schema.
///
/// Weight overrides that would break the sum-to-100 invariant are discarded
/// as a whole. Overrides naming unknown categories are ignored.
pub fn apply_standards(
    schema: ValidationSchema,
    standards: &Standards,
) -> Resolved<ValidationSchema> {
    let mut resolved = Resolved::clean(schema);

    if !standards.weights.is_empty() {
        let mut candidate = resolved.value.clone();
        for (id, weight) in &standards.weights {
            match candidate.categories.iter_mut().find(|c| &c.id == id) {
                Some(category) => category.weight = *weight,
                None => resolved.warn(format!(
                    "Weight override for unknown category '{}' ignored",
                    id
                )),
            }
        }

        let total = candidate.total_weight();
        let valid = standards.weights.values().all(|w| w.is_finite() && *w > 0.0);
        if valid && (total - 100.0).abs() <= WEIGHT_TOLERANCE {
            resolved.value = candidate;
        } else {
            resolved.warn(format!(
                "Weight overrides discarded: weights would sum to {} instead of 100",
                total
            ));
        }
    }

    for (id, minimum) in &standards.minimums {
        if !(0.0..=100.0).contains(minimum) {
            resolved.warn(format!(
                "Minimum {} for category '{}' is outside 0-100; ignored",
                minimum, id
            ));
            continue;
        }
        match resolved.value.categories.iter_mut().find(|c| &c.id == id) {
            Some(category) => category.minimum = Some(*minimum),
            None => resolved.warn(format!(
                "Minimum for unknown category '{}' ignored",
                id
            )),
        }
    }

    resolved
}
