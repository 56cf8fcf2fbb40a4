use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use super::aggregation::Aggregator;
use super::domain::{AnalyzedResult, ScoreEntry, Student, StudentId, Subject, SubjectId};
use super::grading::{ConfigurationError, GradingConfiguration};
use super::ranking::{RankScope, RankingEngine};
use super::summary::{summarize_by_form, FormSummary};

/// Problem with a single score entry found before aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("mark {mark} for subject {subject_id} is outside 0-100")]
    MarkOutOfRange { subject_id: SubjectId, mark: f64 },
    #[error("mark for subject {subject_id} is not numeric")]
    MarkNotNumeric { subject_id: SubjectId },
    #[error("subject {subject_id} has more than one mark")]
    DuplicateEntry { subject_id: SubjectId },
    #[error("student {student_id} is not in the student catalog")]
    UnknownStudent { student_id: StudentId },
    #[error("subject {subject_id} is not offered to {form}")]
    SubjectNotOffered { subject_id: SubjectId, form: String },
}

impl ValidationIssue {
    /// Whether the owning student is left out of the run.
    ///
    /// Bad marks exclude the student; entries that match no student or no
    /// offered subject are dropped on their own.
    pub fn excludes_student(&self) -> bool {
        matches!(
            self,
            ValidationIssue::MarkOutOfRange { .. }
                | ValidationIssue::MarkNotNumeric { .. }
                | ValidationIssue::DuplicateEntry { .. }
        )
    }
}

/// Score entry that did not make it into the run, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedEntry {
    pub student_id: StudentId,
    pub issue: ValidationIssue,
}

/// Output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRun {
    /// Ranked results in student catalog order.
    pub results: Vec<AnalyzedResult>,
    pub rejected: Vec<RejectedEntry>,
    /// Students left out because at least one of their entries was invalid.
    pub excluded_students: Vec<StudentId>,
}

impl AnalysisRun {
    pub fn result_for(&self, student_id: &StudentId) -> Option<&AnalyzedResult> {
        self.results
            .iter()
            .find(|result| &result.student_id == student_id)
    }

    /// One summary per form in the run.
    pub fn summaries(&self, config: &GradingConfiguration) -> Vec<FormSummary> {
        summarize_by_form(&self.results, config)
    }
}

/// Orchestrates validation, aggregation, and ranking for a batch of scores.
pub struct ResultAnalyzer {
    config: GradingConfiguration,
}

impl ResultAnalyzer {
    pub fn new(config: GradingConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GradingConfiguration {
        &self.config
    }

    /// Analyze a batch. Fails only when the grading configuration is unusable.
    pub fn analyze(
        &self,
        scores: &[ScoreEntry],
        students: &[Student],
        subjects: &[Subject],
    ) -> Result<AnalysisRun, ConfigurationError> {
        self.config.validate()?;

        let offered = subjects_by_form(subjects);
        let screened = screen_entries(scores, students, &offered);

        for student_id in &screened.excluded {
            warn!(student = %student_id, "student excluded from analysis run");
        }

        let aggregator = Aggregator::new(&self.config);
        let no_subjects: Vec<Subject> = Vec::new();

        let aggregated: Vec<AnalyzedResult> = students
            .par_iter()
            .filter(|student| !screened.excluded.contains(&student.id))
            .map(|student| {
                let entries = screened
                    .accepted
                    .get(&student.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let expected = offered
                    .get(student.form.as_str())
                    .unwrap_or(&no_subjects);
                aggregator.aggregate(student, entries, expected)
            })
            .collect();

        let results = self.rank_scopes(aggregated);

        debug!(
            version = self.config.version,
            method = self.config.method.label(),
            analyzed = results.len(),
            rejected = screened.rejected.len(),
            "analysis run complete"
        );

        Ok(AnalysisRun {
            results,
            rejected: screened.rejected,
            excluded_students: screened.excluded.into_iter().collect(),
        })
    }

    fn rank_scopes(&self, aggregated: Vec<AnalyzedResult>) -> Vec<AnalyzedResult> {
        let engine = RankingEngine::new(self.config.method, self.config.ranking);
        let catalog_order: HashMap<StudentId, usize> = aggregated
            .iter()
            .enumerate()
            .map(|(index, result)| (result.student_id.clone(), index))
            .collect();

        let ranked = rank_partitioned(aggregated, &engine, RankScope::Overall, |result| {
            (result.form.clone(), None)
        });
        let mut ranked = rank_partitioned(ranked, &engine, RankScope::Stream, |result| {
            (result.form.clone(), result.stream.clone())
        });

        ranked.sort_by_key(|result| {
            catalog_order
                .get(&result.student_id)
                .copied()
                .unwrap_or(usize::MAX)
        });
        ranked
    }
}

/// Analyze a batch with an explicit configuration.
pub fn analyze(
    scores: &[ScoreEntry],
    students: &[Student],
    subjects: &[Subject],
    config: &GradingConfiguration,
) -> Result<AnalysisRun, ConfigurationError> {
    ResultAnalyzer::new(config.clone()).analyze(scores, students, subjects)
}

type ScopeKey = (String, Option<String>);

fn rank_partitioned<F>(
    results: Vec<AnalyzedResult>,
    engine: &RankingEngine,
    scope: RankScope,
    key: F,
) -> Vec<AnalyzedResult>
where
    F: Fn(&AnalyzedResult) -> ScopeKey,
{
    let mut partitions: BTreeMap<ScopeKey, Vec<AnalyzedResult>> = BTreeMap::new();
    for result in results {
        partitions.entry(key(&result)).or_default().push(result);
    }

    partitions
        .into_values()
        .flat_map(|partition| engine.rank(partition, scope))
        .collect()
}

/// Catalog subjects per form, keeping the first listing of a repeated subject.
fn subjects_by_form(subjects: &[Subject]) -> HashMap<&str, Vec<Subject>> {
    let mut offered: HashMap<&str, Vec<Subject>> = HashMap::new();
    for subject in subjects {
        let listed = offered.entry(subject.form.as_str()).or_default();
        if listed.iter().any(|known| known.id == subject.id) {
            debug!(subject = %subject.id, form = %subject.form, "repeated catalog subject ignored");
            continue;
        }
        listed.push(subject.clone());
    }
    offered
}

struct ScreenedEntries {
    accepted: HashMap<StudentId, Vec<ScoreEntry>>,
    rejected: Vec<RejectedEntry>,
    excluded: BTreeSet<StudentId>,
}

fn screen_entries(
    scores: &[ScoreEntry],
    students: &[Student],
    offered: &HashMap<&str, Vec<Subject>>,
) -> ScreenedEntries {
    let catalog: HashMap<&StudentId, &Student> =
        students.iter().map(|student| (&student.id, student)).collect();

    let mut accepted: HashMap<StudentId, Vec<ScoreEntry>> = HashMap::new();
    let mut rejected = Vec::new();
    let mut excluded = BTreeSet::new();
    let mut seen: HashSet<(&StudentId, &SubjectId)> = HashSet::new();

    for entry in scores {
        let issue = match catalog.get(&entry.student_id) {
            None => Some(ValidationIssue::UnknownStudent {
                student_id: entry.student_id.clone(),
            }),
            Some(student) => {
                let is_offered = offered
                    .get(student.form.as_str())
                    .map(|subjects| subjects.iter().any(|subject| subject.id == entry.subject_id))
                    .unwrap_or(false);

                if !is_offered {
                    Some(ValidationIssue::SubjectNotOffered {
                        subject_id: entry.subject_id.clone(),
                        form: student.form.clone(),
                    })
                } else if let Some(issue) = check_mark(entry) {
                    Some(issue)
                } else if !seen.insert((&entry.student_id, &entry.subject_id)) {
                    Some(ValidationIssue::DuplicateEntry {
                        subject_id: entry.subject_id.clone(),
                    })
                } else {
                    None
                }
            }
        };

        match issue {
            Some(issue) => {
                if issue.excludes_student() {
                    excluded.insert(entry.student_id.clone());
                }
                rejected.push(RejectedEntry {
                    student_id: entry.student_id.clone(),
                    issue,
                });
            }
            None => accepted
                .entry(entry.student_id.clone())
                .or_default()
                .push(entry.clone()),
        }
    }

    ScreenedEntries {
        accepted,
        rejected,
        excluded,
    }
}

fn check_mark(entry: &ScoreEntry) -> Option<ValidationIssue> {
    if !entry.mark.is_finite() {
        return Some(ValidationIssue::MarkNotNumeric {
            subject_id: entry.subject_id.clone(),
        });
    }

    if !(0.0..=100.0).contains(&entry.mark) {
        return Some(ValidationIssue::MarkOutOfRange {
            subject_id: entry.subject_id.clone(),
            mark: entry.mark,
        });
    }

    None
}
