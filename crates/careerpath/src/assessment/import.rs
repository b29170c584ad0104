use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{QuestionId, Rating, ResponseSet};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    BlankQuestionId { line: u64 },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read responses: {}", err),
            ImportError::Csv(err) => write!(f, "invalid response CSV: {}", err),
            ImportError::Json(err) => write!(f, "invalid response JSON: {}", err),
            ImportError::BlankQuestionId { line } => {
                write!(f, "response CSV line {} has an empty question_id", line)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Json(err) => Some(err),
            ImportError::BlankQuestionId { .. } => None,
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

#[derive(Debug, Deserialize)]
struct ResponseRow {
    question_id: String,
    rating: Rating,
}

/// Loads response sets exported as `question_id,rating` CSV or as a flat JSON object.
pub struct ResponseImporter;

impl ResponseImporter {
    /// Format is picked from the extension: `.json` is JSON, anything else CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ResponseSet, ImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_reader(file)
        } else {
            Self::from_reader(file)
        }
    }

    /// Later rows overwrite earlier rows for the same question.
    pub fn from_reader<R: Read>(reader: R) -> Result<ResponseSet, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut record = csv::StringRecord::new();
        let mut responses = ResponseSet::new();

        while csv_reader.read_record(&mut record)? {
            let row: ResponseRow = record.deserialize(Some(&headers))?;
            if row.question_id.is_empty() {
                let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                return Err(ImportError::BlankQuestionId { line });
            }
            responses.insert(QuestionId(row.question_id), row.rating);
        }

        Ok(responses)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<ResponseSet, ImportError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
