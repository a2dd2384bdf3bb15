//! Error types for trainer-core.

use crate::types::ExerciseType;
use thiserror::Error;

/// Result type alias using ContentError.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors found by the content validation pass.
///
/// These are authoring mistakes, caught before content reaches a session.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("exercise {id}: declared type {declared} but content is {actual}")]
    TypeMismatch {
        id: String,
        declared: ExerciseType,
        actual: ExerciseType,
    },

    #[error("duplicate exercise ID {id}")]
    DuplicateId { id: String },

    #[error("exercise {id}: missing {field}")]
    MissingField { id: String, field: &'static str },

    #[error("exercise {id}: {reason}")]
    Invalid { id: String, reason: String },
}

/// Errors from scoring rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("attempt count must be positive, got {0}")]
    InvalidAttempts(i64),

    #[error("stars per level must be positive")]
    InvalidStarsPerLevel,
}
