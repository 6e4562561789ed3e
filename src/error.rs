//! Typed errors for the data store.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use thiserror::Error;

/// Errors raised while reading or writing the local store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}
