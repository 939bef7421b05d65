//! Values paired with the warnings produced while resolving them

/// A resolved value plus every fallback warning raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> Resolved<T> {
    /// A value that resolved without incident.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// A value obtained by falling back, logging the reason.
    pub fn fallback(value: T, warning: impl Into<String>) -> Self {
        let warning = warning.into();
        tracing::warn!("{}", warning);
        Self {
            value,
            warnings: vec![warning],
        }
    }

    /// Record an additional warning.
    pub fn warn(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Split into the value and its warnings.
    pub fn into_parts(self) -> (T, Vec<String>) {
        (self.value, self.warnings)
    }
}
