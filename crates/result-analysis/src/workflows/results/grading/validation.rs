use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::{Grade, GradingConfiguration, ThresholdTable};

/// Names the threshold table a configuration problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    SubjectMarks,
    TotalMarks,
    TotalPoints,
}

impl TableKind {
    pub fn label(&self) -> &'static str {
        match self {
            TableKind::SubjectMarks => "subject marks",
            TableKind::TotalMarks => "total marks",
            TableKind::TotalPoints => "total points",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structural problem that makes every grade of a run unreliable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{table} threshold table is empty")]
    EmptyTable { table: TableKind },
    #[error("{table} threshold for grade {grade} is not a finite number")]
    NonFiniteMinimum { table: TableKind, grade: Grade },
    #[error(
        "{table} threshold table is not sorted descending: {grade} ({minimum}) follows {previous_minimum}"
    )]
    NotDescending {
        table: TableKind,
        grade: Grade,
        minimum: f64,
        previous_minimum: f64,
    },
    #[error("{table} threshold table lists grade {grade} more than once")]
    DuplicateGrade { table: TableKind, grade: Grade },
}

impl GradingConfiguration {
    /// Check every threshold table before any grade is computed.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_table(TableKind::SubjectMarks, &self.subject_marks_thresholds)?;
        validate_table(TableKind::TotalMarks, &self.total_marks_thresholds)?;
        validate_table(TableKind::TotalPoints, &self.points_total_thresholds)?;
        Ok(())
    }
}

fn validate_table(kind: TableKind, table: &ThresholdTable) -> Result<(), ConfigurationError> {
    if table.is_empty() {
        return Err(ConfigurationError::EmptyTable { table: kind });
    }

    let mut seen = HashSet::new();
    let mut previous: Option<f64> = None;

    for tier in table.iter() {
        if !tier.minimum.is_finite() {
            return Err(ConfigurationError::NonFiniteMinimum {
                table: kind,
                grade: tier.grade.clone(),
            });
        }

        if !seen.insert(&tier.grade) {
            return Err(ConfigurationError::DuplicateGrade {
                table: kind,
                grade: tier.grade.clone(),
            });
        }

        // Equal minimums would make the lower tier unreachable.
        if let Some(previous_minimum) = previous {
            if tier.minimum >= previous_minimum {
                return Err(ConfigurationError::NotDescending {
                    table: kind,
                    grade: tier.grade.clone(),
                    minimum: tier.minimum,
                    previous_minimum,
                });
            }
        }
        previous = Some(tier.minimum);
    }

    Ok(())
}
