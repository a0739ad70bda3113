//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent a corrupt or unexpected catalog shape.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed node at '{path}': expected null or mapping, found {found}")]
    MalformedNode { path: String, found: String },

    #[error("invalid field '{field}' at '{path}': expected {expected}")]
    InvalidField {
        path: String,
        field: String,
        expected: String,
    },

    #[error("invalid document root: expected mapping, found {found}")]
    InvalidRoot { found: String },

    #[error("invalid key under '{path}': keys must be scalars")]
    InvalidKey { path: String },

    #[error("unsafe path segment '{segment}': must be a single non-empty name without separators or '..'")]
    UnsafeSegment { segment: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
