//! Error taxonomy for the submission pipeline.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::blockchain::SubmissionError;

/// Which rule a request broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    InvalidChain,
    InvalidAddress,
    InvalidValue,
    InvalidData,
    InvalidIdempotencyKey,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidChain => "InvalidChain",
            ValidationErrorKind::InvalidAddress => "InvalidAddress",
            ValidationErrorKind::InvalidValue => "InvalidValue",
            ValidationErrorKind::InvalidData => "InvalidData",
            ValidationErrorKind::InvalidIdempotencyKey => "InvalidIdempotencyKey",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected request. Never retried, never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} ({field}): {detail}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub field: &'static str,
    pub detail: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, field: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            field,
            detail: detail.into(),
        }
    }
}

/// Errors surfaced by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ValidationError::new(
            ValidationErrorKind::InvalidChain,
            "chain",
            "unknown chain 'bitcoin'",
        );
        assert_eq!(err.to_string(), "InvalidChain (chain): unknown chain 'bitcoin'");

        let err = HandleError::from(err);
        assert!(err.to_string().starts_with("InvalidChain"));
    }

    #[test]
    fn test_kind_serializes_as_name() {
        let json = serde_json::to_string(&ValidationErrorKind::InvalidIdempotencyKey).unwrap();
        assert_eq!(json, "\"InvalidIdempotencyKey\"");
    }
}
