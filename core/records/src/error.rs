//! FILENAME: core/records/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Record {record} is missing field '{field}'")]
    MissingField { field: String, record: usize },

    #[error("Invalid fiscal year: {0}")]
    InvalidYear(String),
}
