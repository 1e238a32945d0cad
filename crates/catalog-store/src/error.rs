//! Error types for the catalog-store crate.

use thiserror::Error;

/// Errors that can occur while reading, writing or loading the record store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store file could not be found or opened
    #[error("Failed to open store file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing the store file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Store file is not valid JSON or does not match the entry layout
    #[error("Malformed store file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record with this id already exists
    #[error("Duplicate entry id: {0}")]
    DuplicateId(String),

    /// A record field had an invalid value
    #[error("Invalid value for {field} in entry {id:?}: {reason}")]
    InvalidEntry {
        id: String,
        field: String,
        reason: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
