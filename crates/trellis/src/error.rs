//! Error types for trellis operations.

use crate::domain::IssueUrl;
use std::io;
use thiserror::Error;

/// The error type for trellis operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Issue not found in the collection.
    #[error("Issue not found: {0}")]
    IssueNotFound(IssueUrl),

    /// A raw provider record is missing a field the normalizer requires.
    ///
    /// This is a contract violation by the fetch collaborator, not a user
    /// error: the record is skipped and reported, the batch continues.
    #[error("{provider} record is missing required field `{field}`")]
    MissingField {
        /// Provider kind that produced the record.
        provider: &'static str,
        /// Name of the absent field.
        field: &'static str,
    },

    /// The blocks relation contains a cycle, so recursive weight
    /// aggregation has no finite value.
    #[error("dependency cycle detected at {0}")]
    DependencyCycle(IssueUrl),

    /// Structural error while building the output diagram.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<trellis_jsonl::Error> for Error {
    fn from(err: trellis_jsonl::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// A specialized Result type for trellis operations.
pub type Result<T> = std::result::Result<T, Error>;
