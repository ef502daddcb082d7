//! FILENAME: core/grouping-engine/src/error.rs

use records::RecordError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupingError {
    #[error("Record {record} is missing field '{field}'")]
    MissingField { field: String, record: usize },

    #[error("Malformed group tree: expected depth {expected}, found {found}")]
    MalformedTree { expected: usize, found: usize },

    #[error("Key path must have between 1 and 3 extractors, got {0}")]
    InvalidKeyPath(usize),

    #[error("Cannot derive group key from field '{field}': {reason}")]
    InvalidKey { field: String, reason: String },
}

impl From<RecordError> for GroupingError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::MissingField { field, record } => {
                GroupingError::MissingField { field, record }
            }
            RecordError::InvalidYear(year) => GroupingError::InvalidKey {
                field: "year".to_string(),
                reason: format!("'{}' is not a fiscal year", year),
            },
        }
    }
}
