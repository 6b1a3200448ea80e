//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors carry domain errors together with the file they came from.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("case file not found: {0}")]
    CaseFileNotFound(PathBuf),

    #[error("{path}: {source}")]
    InvalidCaseFile {
        path: PathBuf,
        #[source]
        source: DomainError,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
