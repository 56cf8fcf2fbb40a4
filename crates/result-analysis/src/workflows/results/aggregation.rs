use super::domain::{
    from_hundredths, to_hundredths, AnalyzedResult, ScoreEntry, Student, Subject, SubjectResult,
};
use super::grading::{classify, GradingConfiguration, GradingMethod, MissingSubjectPolicy};

/// Stateless per-student aggregator applying one grading configuration.
pub struct Aggregator<'a> {
    config: &'a GradingConfiguration,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a GradingConfiguration) -> Self {
        Self { config }
    }

    /// Grade every expected subject for `student` and total the results.
    ///
    /// `subjects` fixes both which subjects are expected and the order of the
    /// returned subject list. Entries for other students or other subjects are
    /// ignored; when a subject has several entries the first one is used, since
    /// the analyzer rejects duplicates before aggregation.
    pub fn aggregate(
        &self,
        student: &Student,
        entries: &[ScoreEntry],
        subjects: &[Subject],
    ) -> AnalyzedResult {
        let mut subject_results = Vec::with_capacity(subjects.len());
        let mut total_hundredths: i64 = 0;
        let mut total_points: u32 = 0;

        for subject in subjects {
            let recorded = entries
                .iter()
                .find(|entry| entry.student_id == student.id && entry.subject_id == subject.id)
                .map(|entry| entry.mark);

            let (mark, missing) = match (recorded, self.config.missing_subjects) {
                (Some(mark), _) => (mark, false),
                (None, MissingSubjectPolicy::ZeroFill) => (0.0, true),
                (None, MissingSubjectPolicy::Exclude) => continue,
            };

            let grade = classify(mark, &self.config.subject_marks_thresholds);
            total_hundredths += to_hundredths(mark);
            total_points += self.config.points_for(&grade);

            subject_results.push(SubjectResult {
                subject_id: subject.id.clone(),
                subject: subject.name.clone(),
                mark,
                grade,
                missing,
            });
        }

        let total_marks = from_hundredths(total_hundredths);
        let overall_grade = match self.config.method {
            GradingMethod::Points => classify(
                f64::from(total_points),
                &self.config.points_total_thresholds,
            ),
            GradingMethod::TotalMarks => {
                classify(total_marks, &self.config.total_marks_thresholds)
            }
        };

        AnalyzedResult {
            student_id: student.id.clone(),
            name: student.name.clone(),
            admission_number: student.admission_number.clone(),
            form: student.form.clone(),
            stream: student.stream.clone(),
            subjects: subject_results,
            total_marks,
            total_points,
            overall_grade,
            stream_rank: None,
            overall_rank: None,
        }
    }
}
