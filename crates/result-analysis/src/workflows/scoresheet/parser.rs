use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::results::domain::{parse_mark, ScoreEntry, StudentId, SubjectId};

pub(crate) fn parse_scores<R: Read>(reader: R) -> Result<Vec<ScoreEntry>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for record in csv_reader.deserialize::<ScoreRow>() {
        let row = record?;
        entries.push(row.into_entry());
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    #[serde(alias = "Student", alias = "student")]
    student_id: String,
    #[serde(alias = "Subject", alias = "subject")]
    subject_id: String,
    #[serde(
        alias = "Mark",
        alias = "Score",
        alias = "score",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    mark: Option<String>,
}

impl ScoreRow {
    fn into_entry(self) -> ScoreEntry {
        let mark = self.mark.as_deref().map(parse_mark).unwrap_or(f64::NAN);
        ScoreEntry {
            student_id: StudentId(self.student_id),
            subject_id: SubjectId(self.subject_id),
            mark,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
