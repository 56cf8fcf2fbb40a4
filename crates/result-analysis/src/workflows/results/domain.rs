use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::grading::{Grade, GradingMethod, PointsTable};

/// Identifier wrapper for enrolled students.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for catalog subjects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Student record supplied by the student-management collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub admission_number: String,
    pub form: String,
    #[serde(default)]
    pub stream: Option<String>,
}

/// Subject offered to one form. Catalog order is the reporting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub form: String,
}

/// Raw mark recorded for one student in one subject.
///
/// Marks that are missing or not numeric at the boundary are carried as NaN so
/// validation can reject the owning student instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    #[serde(deserialize_with = "deserialize_mark")]
    pub mark: f64,
}

impl ScoreEntry {
    pub fn new(student_id: &str, subject_id: &str, mark: f64) -> Self {
        Self {
            student_id: StudentId(student_id.to_string()),
            subject_id: SubjectId(subject_id.to_string()),
            mark,
        }
    }
}

pub(crate) fn parse_mark(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Marks and totals are compared in hundredths so that sums of decimal marks
/// land exactly on the values they add up to.
pub(crate) fn to_hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

pub(crate) fn from_hundredths(hundredths: i64) -> f64 {
    hundredths as f64 / 100.0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMark {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn deserialize_mark<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawMark>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawMark::Number(mark)) => mark,
        Some(RawMark::Text(text)) => parse_mark(&text),
        Some(RawMark::Other(_)) | None => f64::NAN,
    })
}

/// Graded mark for one subject of an analyzed student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectResult {
    pub subject_id: SubjectId,
    pub subject: String,
    pub mark: f64,
    pub grade: Grade,
    /// No score entry existed; the mark was zero-filled.
    #[serde(default)]
    pub missing: bool,
}

/// Canonical per-student output of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedResult {
    pub student_id: StudentId,
    pub name: String,
    pub admission_number: String,
    pub form: String,
    pub stream: Option<String>,
    pub subjects: Vec<SubjectResult>,
    pub total_marks: f64,
    pub total_points: u32,
    pub overall_grade: Grade,
    pub stream_rank: Option<u32>,
    pub overall_rank: Option<u32>,
}

impl AnalyzedResult {
    /// Value the overall grade and the ranks are computed from.
    pub fn metric(&self, method: GradingMethod) -> f64 {
        match method {
            GradingMethod::Points => f64::from(self.total_points),
            GradingMethod::TotalMarks => self.total_marks,
        }
    }

    pub fn subject(&self, subject_id: &SubjectId) -> Option<&SubjectResult> {
        self.subjects
            .iter()
            .find(|result| &result.subject_id == subject_id)
    }

    /// Points recomputed from the subject grades; always equals `total_points`.
    pub fn points_from_subjects(&self, points: &PointsTable) -> u32 {
        self.subjects
            .iter()
            .map(|result| points.points(&result.grade))
            .sum()
    }

    pub fn missing_subjects(&self) -> impl Iterator<Item = &SubjectResult> {
        self.subjects.iter().filter(|result| result.missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_entry_accepts_numeric_and_textual_marks() {
        let entries: Vec<ScoreEntry> = serde_json::from_str(
            r#"[
                { "student_id": "s1", "subject_id": "math", "mark": 72.5 },
                { "student_id": "s1", "subject_id": "eng", "mark": " 64 " },
                { "student_id": "s1", "subject_id": "kis", "mark": "absent" },
                { "student_id": "s1", "subject_id": "bio", "mark": null }
            ]"#,
        )
        .expect("entries parse");

        assert_eq!(entries[0].mark, 72.5);
        assert_eq!(entries[1].mark, 64.0);
        assert!(entries[2].mark.is_nan());
        assert!(entries[3].mark.is_nan());
    }

    #[test]
    fn unexpected_mark_shapes_become_non_numeric() {
        let entries: Vec<ScoreEntry> = serde_json::from_str(
            r#"[
                { "student_id": "s1", "subject_id": "math", "mark": true },
                { "student_id": "s1", "subject_id": "eng", "mark": { "value": 70 } },
                { "student_id": "s1", "subject_id": "kis", "mark": [70] }
            ]"#,
        )
        .expect("entries parse");

        assert!(entries.iter().all(|entry| entry.mark.is_nan()));
    }

    #[test]
    fn hundredths_absorb_binary_rounding() {
        assert_eq!(to_hundredths(0.1 + 0.2), to_hundredths(0.3));
        assert_eq!(from_hundredths(to_hundredths(72.5) + to_hundredths(64.25)), 136.75);
    }

    #[test]
    fn student_stream_is_optional() {
        let student: Student = serde_json::from_str(
            r#"{ "id": "s1", "name": "Achieng", "admission_number": "1001", "form": "Form 2" }"#,
        )
        .expect("student parses");

        assert_eq!(student.stream, None);
    }
}
