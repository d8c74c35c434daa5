//! Error types for header queries.

use std::path::PathBuf;

use crate::expr::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid expression: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source unavailable: {source_id}: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    #[error("Invalid extension list: {0}")]
    InvalidExtension(String),

    #[error("Invalid keyword list: {0}")]
    InvalidKeywords(String),

    #[error("Duplicate row {source_id}[{extension}]")]
    DuplicateRow { source_id: String, extension: usize },

    #[error("No sources matched: {0}")]
    NoSources(String),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Query cancelled")]
    Cancelled,
}

impl Error {
    /// Build a [`Error::SourceUnavailable`] for `source_id`.
    pub fn unavailable(source_id: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
