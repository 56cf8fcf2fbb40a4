//! Result analysis: grading raw subject marks, aggregating them per student,
//! and ranking students within their form and stream.
//!
//! Every run is a pure function of its inputs. The grading configuration is
//! passed in explicitly and each run produces a fresh set of results.

pub mod aggregation;
pub mod analyzer;
pub mod domain;
pub mod grading;
pub mod ranking;
pub mod summary;

#[cfg(test)]
mod tests;

pub use aggregation::Aggregator;
pub use analyzer::{analyze, AnalysisRun, RejectedEntry, ResultAnalyzer, ValidationIssue};
pub use domain::{
    AnalyzedResult, ScoreEntry, Student, StudentId, Subject, SubjectId, SubjectResult,
};
pub use grading::{
    classify, ConfigurationError, Grade, GradingConfiguration, GradingMethod,
    MissingSubjectPolicy, PointsTable, TableKind, Threshold, ThresholdTable,
};
pub use ranking::{RankScope, RankingEngine, RankingPolicy};
pub use summary::{
    summarize, summarize_by_form, ClassSummary, FormSummary, GradeCount, SubjectSummary,
};
