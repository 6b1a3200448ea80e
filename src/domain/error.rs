//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of registry or case-file rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("profile already registered: {0}")]
    DuplicateKey(String),

    #[error("invalid case file at line {line}: {message}")]
    InvalidCaseFile { line: usize, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
