use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Grade;
use crate::workflows::results::ranking::RankingPolicy;

/// Quantity the overall grade (and therefore ranking) is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingMethod {
    #[default]
    Points,
    TotalMarks,
}

impl GradingMethod {
    pub fn label(&self) -> &'static str {
        match self {
            GradingMethod::Points => "points",
            GradingMethod::TotalMarks => "total marks",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "points" => Some(Self::Points),
            "totalmarks" | "marks" => Some(Self::TotalMarks),
            _ => None,
        }
    }
}

/// What happens to an expected subject a student has no mark for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSubjectPolicy {
    /// Record the subject with mark 0 (grade `E`) and flag it as missing.
    #[default]
    ZeroFill,
    /// Leave the subject out of the student's subject list and totals.
    Exclude,
}

/// Single tier of a threshold table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub grade: Grade,
    pub minimum: f64,
}

/// Tiers ordered by descending minimum. Walked top to bottom by the classifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable(Vec<Threshold>);

impl ThresholdTable {
    pub fn new(thresholds: Vec<Threshold>) -> Self {
        Self(thresholds)
    }

    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(grade, minimum)| Threshold {
                    grade: Grade::new(*grade),
                    minimum: *minimum,
                })
                .collect(),
        )
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Threshold> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Grades reachable through this table, best first, ending with the fallback.
    pub fn grade_scale(&self) -> Vec<Grade> {
        let mut scale: Vec<Grade> = self.0.iter().map(|tier| tier.grade.clone()).collect();
        let fallback = Grade::fallback();
        if !scale.contains(&fallback) {
            scale.push(fallback);
        }
        scale
    }
}

/// Grade to points conversion. Grades missing from the table are worth zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsTable(BTreeMap<Grade, u32>);

impl PointsTable {
    pub fn new(points: BTreeMap<Grade, u32>) -> Self {
        Self(points)
    }

    pub fn points(&self, grade: &Grade) -> u32 {
        self.0.get(grade).copied().unwrap_or(0)
    }
}

impl Default for PointsTable {
    fn default() -> Self {
        let points = [
            ("A", 12),
            ("A-", 11),
            ("B+", 10),
            ("B", 9),
            ("B-", 8),
            ("C+", 7),
            ("C", 6),
            ("C-", 5),
            ("D+", 4),
            ("D", 3),
            ("D-", 2),
            ("E", 1),
        ]
        .into_iter()
        .map(|(grade, points)| (Grade::new(grade), points))
        .collect();

        Self(points)
    }
}

/// Complete, immutable grading rules for one analysis run.
///
/// A run borrows the configuration for its whole duration, so changing the
/// rules means building a new value (see [`GradingConfiguration::with_method`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfiguration {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub method: GradingMethod,
    #[serde(default = "default_subject_marks_thresholds")]
    pub subject_marks_thresholds: ThresholdTable,
    #[serde(default = "default_total_marks_thresholds")]
    pub total_marks_thresholds: ThresholdTable,
    #[serde(default = "default_points_total_thresholds")]
    pub points_total_thresholds: ThresholdTable,
    #[serde(default)]
    pub grade_points: PointsTable,
    #[serde(default)]
    pub missing_subjects: MissingSubjectPolicy,
    #[serde(default)]
    pub ranking: RankingPolicy,
}

impl Default for GradingConfiguration {
    fn default() -> Self {
        Self {
            version: default_version(),
            method: GradingMethod::default(),
            subject_marks_thresholds: default_subject_marks_thresholds(),
            total_marks_thresholds: default_total_marks_thresholds(),
            points_total_thresholds: default_points_total_thresholds(),
            grade_points: PointsTable::default(),
            missing_subjects: MissingSubjectPolicy::default(),
            ranking: RankingPolicy::default(),
        }
    }
}

impl GradingConfiguration {
    /// Copy of this configuration using `method`. The version is bumped when the method changes.
    pub fn with_method(&self, method: GradingMethod) -> Self {
        let mut next = self.clone();
        if next.method != method {
            next.method = method;
            next.version += 1;
        }
        next
    }

    /// Copy of this configuration using `policy` for ties. The version is bumped when it changes.
    pub fn with_ranking(&self, policy: RankingPolicy) -> Self {
        let mut next = self.clone();
        if next.ranking != policy {
            next.ranking = policy;
            next.version += 1;
        }
        next
    }

    /// Copy of this configuration using `policy` for absent marks. The version is bumped when it changes.
    pub fn with_missing_subjects(&self, policy: MissingSubjectPolicy) -> Self {
        let mut next = self.clone();
        if next.missing_subjects != policy {
            next.missing_subjects = policy;
            next.version += 1;
        }
        next
    }

    /// Table the overall grade is classified against under the active method.
    pub fn overall_thresholds(&self) -> &ThresholdTable {
        match self.method {
            GradingMethod::Points => &self.points_total_thresholds,
            GradingMethod::TotalMarks => &self.total_marks_thresholds,
        }
    }

    pub fn points_for(&self, grade: &Grade) -> u32 {
        self.grade_points.points(grade)
    }
}

fn default_version() -> u32 {
    1
}

fn default_subject_marks_thresholds() -> ThresholdTable {
    ThresholdTable::from_pairs(&[
        ("A", 80.0),
        ("A-", 75.0),
        ("B+", 70.0),
        ("B", 65.0),
        ("B-", 60.0),
        ("C+", 55.0),
        ("C", 50.0),
        ("C-", 45.0),
        ("D+", 40.0),
        ("D", 35.0),
        ("D-", 30.0),
    ])
}

// Percentages of an 11 subject maximum of 1100.
fn default_total_marks_thresholds() -> ThresholdTable {
    ThresholdTable::from_pairs(&[
        ("A", 880.0),
        ("A-", 825.0),
        ("B+", 770.0),
        ("B", 715.0),
        ("B-", 660.0),
        ("C+", 605.0),
        ("C", 550.0),
        ("C-", 495.0),
        ("D+", 440.0),
        ("D", 385.0),
        ("D-", 330.0),
    ])
}

fn default_points_total_thresholds() -> ThresholdTable {
    ThresholdTable::from_pairs(&[
        ("A", 81.0),
        ("A-", 74.0),
        ("B+", 67.0),
        ("B", 64.0),
        ("B-", 54.0),
        ("C+", 46.0),
        ("C", 40.0),
        ("C-", 37.0),
        ("D+", 33.0),
        ("D", 29.0),
        ("D-", 25.0),
    ])
}
