//! FILENAME: app/src/error.rs

use grouping_engine::GroupingError;
use records::RecordError;
use store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Grouping error: {0}")]
    Grouping(#[from] GroupingError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// The request should be sent elsewhere (e.g. a download of a folder).
    #[error("Redirect to {0}")]
    Redirect(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
