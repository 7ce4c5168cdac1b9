//! Error types for the data access layer
//!
//! Every failure a caller may need to show to a user maps to one
//! [`FailureReason`], so the review flow can tell a bad rating from a lost
//! connection without parsing messages.

use skills_model::{ResponseId, ValidationError};

/// Data access error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Document rejected by boundary validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No response with this id
    #[error("response not found: {0}")]
    NotFound(ResponseId),

    /// No form schema has been created yet
    #[error("form schema not found")]
    SchemaNotFound,

    /// Manager rating for a skill the employee never selected or rated
    #[error("conflict: skill '{skill}' has no self-assessment in response {id}")]
    Conflict { id: ResponseId, skill: String },

    /// Storage unreachable or failed to persist
    #[error("storage unavailable: {0}")]
    Transport(String),

    /// Snapshot could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Coarse failure category for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    RatingOutOfRange,
    ExpectationOutOfRange,
    GapInconsistent,
    InvalidInput,
    RecordNotFound,
    Conflict,
    Connectivity,
    Internal,
}

impl FailureReason {
    /// Short human-readable description
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::RatingOutOfRange => "a rating is outside the 1 to 5 scale",
            Self::ExpectationOutOfRange => "an expectation is outside the 1 to 5 scale",
            Self::GapInconsistent => "a gap does not match the manager and self ratings",
            Self::InvalidInput => "the submitted data is incomplete or invalid",
            Self::RecordNotFound => "the record no longer exists",
            Self::Conflict => "a rated skill was never selected by the employee",
            Self::Connectivity => "the storage service could not be reached",
            Self::Internal => "the storage service failed unexpectedly",
        }
    }
}

impl StoreError {
    /// Failure category
    #[must_use]
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::Validation(ValidationError::RatingOutOfRange { .. }) => {
                FailureReason::RatingOutOfRange
            }
            Self::Validation(ValidationError::ExpectationOutOfRange { .. }) => {
                FailureReason::ExpectationOutOfRange
            }
            Self::Validation(ValidationError::GapInconsistent { .. }) => {
                FailureReason::GapInconsistent
            }
            Self::Validation(_) => FailureReason::InvalidInput,
            Self::NotFound(_) | Self::SchemaNotFound => FailureReason::RecordNotFound,
            Self::Conflict { .. } => FailureReason::Conflict,
            Self::Transport(_) => FailureReason::Connectivity,
            Self::Serialization(_) => FailureReason::Internal,
        }
    }

    /// Check if resubmitting unchanged data could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if the failure is a validation rejection
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Create transport error from any displayable cause
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport(cause.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_distinguish_validation_kinds() {
        let rating: StoreError = ValidationError::RatingOutOfRange {
            skill: "Go".to_string(),
            value: 6,
        }
        .into();
        assert_eq!(rating.reason(), FailureReason::RatingOutOfRange);

        let gap: StoreError = ValidationError::GapInconsistent {
            skill: "Go".to_string(),
            gap: 3,
            expected: Some(1),
        }
        .into();
        assert_eq!(gap.reason(), FailureReason::GapInconsistent);

        assert_eq!(
            StoreError::NotFound(ResponseId::new()).reason(),
            FailureReason::RecordNotFound
        );
        assert_eq!(
            StoreError::transport("connection refused").reason(),
            FailureReason::Connectivity
        );
    }

    #[test]
    fn only_transport_is_retryable() {
        assert!(StoreError::transport("timeout").is_retryable());
        assert!(!StoreError::SchemaNotFound.is_retryable());
    }

    #[test]
    fn conflict_display() {
        let id = ResponseId::new();
        let err = StoreError::Conflict {
            id,
            skill: "Rust".to_string(),
        };
        assert_eq!(
            err.to_string(),
            format!("conflict: skill 'Rust' has no self-assessment in response {id}")
        );
    }
}
