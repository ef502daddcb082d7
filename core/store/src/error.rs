//! FILENAME: core/store/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Index '{index}' not found on table '{table}'")]
    IndexNotFound { table: String, index: String },

    #[error("No such key '{key}' in bucket '{bucket}'")]
    NoSuchKey { bucket: String, key: String },

    #[error("Item for table '{table}' is missing key attribute '{attribute}'")]
    MissingKeyAttribute { table: String, attribute: String },

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}
