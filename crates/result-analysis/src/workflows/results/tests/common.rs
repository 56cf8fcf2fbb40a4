use crate::workflows::results::domain::{
    AnalyzedResult, ScoreEntry, Student, StudentId, Subject, SubjectId,
};
use crate::workflows::results::grading::{Grade, GradingConfiguration};

pub(super) const FORM: &str = "Form 2";

pub(super) fn grading_config() -> GradingConfiguration {
    GradingConfiguration::default()
}

pub(super) fn student(id: &str, admission_number: &str, stream: Option<&str>) -> Student {
    Student {
        id: StudentId(id.to_string()),
        name: format!("Student {id}"),
        admission_number: admission_number.to_string(),
        form: FORM.to_string(),
        stream: stream.map(str::to_string),
    }
}

pub(super) fn subject(id: &str, name: &str) -> Subject {
    Subject {
        id: SubjectId(id.to_string()),
        name: name.to_string(),
        form: FORM.to_string(),
    }
}

/// Mathematics, English, Kiswahili in catalog order.
pub(super) fn core_subjects() -> Vec<Subject> {
    vec![
        subject("math", "Mathematics"),
        subject("eng", "English"),
        subject("kis", "Kiswahili"),
    ]
}

pub(super) fn entry(student_id: &str, subject_id: &str, mark: f64) -> ScoreEntry {
    ScoreEntry::new(student_id, subject_id, mark)
}

/// Three entries per student, one for each core subject.
pub(super) fn full_marks(student_id: &str, marks: [f64; 3]) -> Vec<ScoreEntry> {
    ["math", "eng", "kis"]
        .into_iter()
        .zip(marks)
        .map(|(subject_id, mark)| entry(student_id, subject_id, mark))
        .collect()
}

/// Unranked result with fixed totals for ranking tests.
pub(super) fn totals(
    id: &str,
    admission_number: &str,
    stream: Option<&str>,
    total_marks: f64,
    total_points: u32,
) -> AnalyzedResult {
    AnalyzedResult {
        student_id: StudentId(id.to_string()),
        name: format!("Student {id}"),
        admission_number: admission_number.to_string(),
        form: FORM.to_string(),
        stream: stream.map(str::to_string),
        subjects: Vec::new(),
        total_marks,
        total_points,
        overall_grade: Grade::fallback(),
        stream_rank: None,
        overall_rank: None,
    }
}

pub(super) fn grade(symbol: &str) -> Grade {
    Grade::new(symbol)
}
