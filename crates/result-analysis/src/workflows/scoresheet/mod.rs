//! Loading analysis batches from JSON files and score sheets from CSV exports.

mod parser;

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::workflows::results::domain::{ScoreEntry, Student, Subject};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read input: {}", err),
            ImportError::Csv(err) => write!(f, "invalid score sheet: {}", err),
            ImportError::Json(err) => write!(f, "invalid batch file: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Catalogs and raw scores for one analysis run, as exchanged with the
/// surrounding application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBatch {
    pub students: Vec<Student>,
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
}

impl AnalysisBatch {
    /// Replace the batch scores, e.g. with a separately exported score sheet.
    pub fn with_scores(mut self, scores: Vec<ScoreEntry>) -> Self {
        self.scores = scores;
        self
    }
}

pub struct ScoreSheetImporter;

impl ScoreSheetImporter {
    pub fn batch_from_path<P: AsRef<Path>>(path: P) -> Result<AnalysisBatch, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::batch_from_reader(file)
    }

    pub fn batch_from_reader<R: Read>(reader: R) -> Result<AnalysisBatch, ImportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn scores_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ScoreEntry>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::scores_from_reader(file)
    }

    /// Read a CSV score sheet with `student_id,subject_id,mark` columns.
    ///
    /// Blank or non-numeric marks are kept as NaN so the analyzer can report
    /// them against the student.
    pub fn scores_from_reader<R: Read>(reader: R) -> Result<Vec<ScoreEntry>, ImportError> {
        Ok(parser::parse_scores(reader)?)
    }
}
