//! Errors raised while building or storing invoices.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rejections from invoice constructors and the repository.
///
/// Form-level failures carry per-field detail in the invoicing crate; this type
/// only says what was wrong with a value or record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Blank names, quantity below 1, negative or non-finite rate, no items.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Derived data disagrees with its inputs (a bug, not user input).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Duplicate invoice id or invoice number.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
