//! Review errors

use skills_store::{FailureReason, StoreError};

use crate::session::ReviewPhase;

/// Review editing or saving failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    /// No record matches the skill/section pair
    #[error("no review record for skill '{skill}' in section '{section}'")]
    UnknownSkill { skill: String, section: String },

    /// Edits are only accepted while editing
    #[error("review is read-only while {0}")]
    ReadOnly(ReviewPhase),

    /// A save is already waiting for the store
    #[error("a save is already in flight")]
    SaveInFlight,

    /// Save requested outside the editing phase
    #[error("cannot save while {0}")]
    NotEditing(ReviewPhase),

    /// Save outcome reported with no save in flight
    #[error("no save in flight while {0}")]
    NotSaving(ReviewPhase),

    /// The store rejected or failed the save
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReviewError {
    /// Create unknown skill error
    pub fn unknown_skill(skill: impl Into<String>, section: impl Into<String>) -> Self {
        Self::UnknownSkill {
            skill: skill.into(),
            section: section.into(),
        }
    }

    /// Failure category, for store failures
    #[must_use]
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Self::Store(err) => Some(err.reason()),
            _ => None,
        }
    }
}

/// Result type alias for review operations
pub type ReviewResult<T> = Result<T, ReviewError>;
