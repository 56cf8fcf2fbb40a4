mod config;
mod validation;

pub use config::{
    GradingConfiguration, GradingMethod, MissingSubjectPolicy, PointsTable, Threshold,
    ThresholdTable,
};
pub use validation::{ConfigurationError, TableKind};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter symbol for a performance tier (`A`, `A-`, `B+`, ... `E`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(String);

impl Grade {
    /// Grade assigned when a value sits below every threshold.
    pub const FALLBACK: &'static str = "E";

    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn fallback() -> Self {
        Self::new(Self::FALLBACK)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Grade {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Classify `value` against a descending threshold table.
///
/// The first tier whose minimum is `<= value` wins, so a value equal to a
/// minimum belongs to that tier. Values below every tier, and NaN, fall back
/// to [`Grade::FALLBACK`].
pub fn classify(value: f64, table: &ThresholdTable) -> Grade {
    table
        .iter()
        .find(|tier| value >= tier.minimum)
        .map(|tier| tier.grade.clone())
        .unwrap_or_else(Grade::fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject_table() -> ThresholdTable {
        GradingConfiguration::default().subject_marks_thresholds
    }

    #[test]
    fn threshold_minimum_is_inclusive() {
        let table = subject_table();
        assert_eq!(classify(80.0, &table), Grade::new("A"));
        assert_eq!(classify(79.0, &table), Grade::new("A-"));
        assert_eq!(classify(79.999, &table), Grade::new("A-"));
        assert_eq!(classify(30.0, &table), Grade::new("D-"));
        assert_eq!(classify(29.5, &table), Grade::new("E"));
    }

    #[test]
    fn values_outside_the_table_fall_back() {
        let table = subject_table();
        assert_eq!(classify(-5.0, &table), Grade::fallback());
        assert_eq!(classify(f64::NAN, &table), Grade::fallback());
        assert_eq!(classify(f64::INFINITY, &table), Grade::new("A"));
    }

    #[test]
    fn empty_table_always_falls_back() {
        let table = ThresholdTable::default();
        assert_eq!(classify(100.0, &table), Grade::fallback());
    }

    #[test]
    fn grade_serializes_as_plain_symbol() {
        let json = serde_json::to_string(&Grade::new("B+")).expect("serializes");
        assert_eq!(json, "\"B+\"");
    }
}
