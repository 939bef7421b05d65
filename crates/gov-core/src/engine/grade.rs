//! Letter grades

use serde::{Deserialize, Serialize};

/// Letter grade derived from a 0-100 score.
///
/// Variants are declared worst-first so the derived ordering reads
/// naturally: `Grade::A > Grade::F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    C,
    B,
    A,
}

/// Lower bounds, highest first
const THRESHOLDS: [(f64, Grade); 4] = [
    (90.0, Grade::A),
    (80.0, Grade::B),
    (70.0, Grade::C),
    (60.0, Grade::D),
];

impl Grade {
    /// Map a score onto a grade. NaN maps to F.
    pub fn from_score(score: f64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(minimum, _)| score >= *minimum)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
