use std::collections::HashMap;

use serde::Serialize;

use super::domain::{AnalyzedResult, SubjectId};
use super::grading::{classify, Grade, GradingConfiguration, ThresholdTable};

/// Number of results holding one grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeCount {
    pub grade: Grade,
    pub count: usize,
}

/// Class-level view of one subject across an analyzed batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectSummary {
    pub subject_id: SubjectId,
    pub subject: String,
    pub graded: usize,
    pub mean_mark: f64,
    /// The mean mark classified against the subject table.
    pub mean_grade: Grade,
    pub distribution: Vec<GradeCount>,
}

/// Aggregate figures for the results of one form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub students: usize,
    pub mean_total_marks: f64,
    pub mean_total_points: f64,
    pub overall_distribution: Vec<GradeCount>,
    pub subjects: Vec<SubjectSummary>,
}

/// Summary of one form within a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSummary {
    pub form: String,
    #[serde(flatten)]
    pub summary: ClassSummary,
}

struct SubjectTally {
    name: String,
    marks: Vec<f64>,
    grades: Vec<Grade>,
}

/// Summarize analyzed results as one class. Zero-filled subjects count like recorded marks.
///
/// `results` should come from a single form; use [`summarize_by_form`] for a
/// mixed batch. Subjects are listed in the order they first appear in
/// `results`, which for analyzer output is the catalog order.
pub fn summarize(results: &[AnalyzedResult], config: &GradingConfiguration) -> ClassSummary {
    let mut order: Vec<SubjectId> = Vec::new();
    let mut tallies: HashMap<SubjectId, SubjectTally> = HashMap::new();

    for result in results {
        for subject in &result.subjects {
            let tally = tallies.entry(subject.subject_id.clone()).or_insert_with(|| {
                order.push(subject.subject_id.clone());
                SubjectTally {
                    name: subject.subject.clone(),
                    marks: Vec::new(),
                    grades: Vec::new(),
                }
            });
            tally.marks.push(subject.mark);
            tally.grades.push(subject.grade.clone());
        }
    }

    let subjects = order
        .into_iter()
        .filter_map(|subject_id| {
            let tally = tallies.remove(&subject_id)?;
            let mean_mark = mean(&tally.marks);
            Some(SubjectSummary {
                subject_id,
                subject: tally.name,
                graded: tally.marks.len(),
                mean_mark,
                mean_grade: classify(mean_mark, &config.subject_marks_thresholds),
                distribution: distribution(&config.subject_marks_thresholds, &tally.grades),
            })
        })
        .collect();

    let totals: Vec<f64> = results.iter().map(|result| result.total_marks).collect();
    let points: Vec<f64> = results
        .iter()
        .map(|result| f64::from(result.total_points))
        .collect();
    let overall: Vec<Grade> = results
        .iter()
        .map(|result| result.overall_grade.clone())
        .collect();

    ClassSummary {
        students: results.len(),
        mean_total_marks: mean(&totals),
        mean_total_points: mean(&points),
        overall_distribution: distribution(config.overall_thresholds(), &overall),
        subjects,
    }
}

/// One summary per form, in the order forms first appear in `results`.
pub fn summarize_by_form(
    results: &[AnalyzedResult],
    config: &GradingConfiguration,
) -> Vec<FormSummary> {
    let mut forms: Vec<(String, Vec<AnalyzedResult>)> = Vec::new();
    for result in results {
        match forms.iter_mut().find(|(form, _)| form == &result.form) {
            Some((_, members)) => members.push(result.clone()),
            None => forms.push((result.form.clone(), vec![result.clone()])),
        }
    }

    forms
        .into_iter()
        .map(|(form, members)| FormSummary {
            form,
            summary: summarize(&members, config),
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Counts for every grade of `table`, best first. Grades outside the table are appended.
fn distribution(table: &ThresholdTable, grades: &[Grade]) -> Vec<GradeCount> {
    let mut counts: Vec<GradeCount> = table
        .grade_scale()
        .into_iter()
        .map(|grade| GradeCount { grade, count: 0 })
        .collect();

    for grade in grades {
        match counts.iter_mut().find(|entry| &entry.grade == grade) {
            Some(entry) => entry.count += 1,
            None => counts.push(GradeCount {
                grade: grade.clone(),
                count: 1,
            }),
        }
    }

    counts
}
