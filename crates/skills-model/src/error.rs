//! Validation errors for survey responses, reviews and form schemas
//!
//! These are raised at the data-access boundary and at intake. The review
//! engine itself never produces them; it only passes them through.

/// Validation failure for a document about to be persisted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Self or manager rating outside 1..=5
    #[error("rating {value} for '{skill}' is outside 1..=5")]
    RatingOutOfRange { skill: String, value: u8 },

    /// Expectation outside 1..=5
    #[error("expectation {value} for '{skill}' is outside 1..=5")]
    ExpectationOutOfRange { skill: String, value: u8 },

    /// Stored gap disagrees with manager rating minus self rating
    #[error("gap {gap} for '{skill}' is inconsistent with the ratings (expected {})", display_expected(.expected))]
    GapInconsistent {
        skill: String,
        gap: i8,
        expected: Option<i8>,
    },

    /// Required field missing or blank
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Email rejected at intake
    #[error("invalid email '{email}': {reason}")]
    InvalidEmail { email: String, reason: String },

    /// Same skill listed twice in one list
    #[error("skill '{skill}' appears more than once in {list}")]
    DuplicateSkill { skill: String, list: &'static str },

    /// Form schema definition rejected
    #[error("invalid form schema: {0}")]
    InvalidSchema(String),
}

fn display_expected(expected: &Option<i8>) -> String {
    expected.map_or_else(|| "no gap, skill not manager-rated".to_string(), |g| g.to_string())
}

impl ValidationError {
    /// Stable machine-readable kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RatingOutOfRange { .. } => "rating_out_of_range",
            Self::ExpectationOutOfRange { .. } => "expectation_out_of_range",
            Self::GapInconsistent { .. } => "gap_inconsistent",
            Self::MissingField(_) => "missing_field",
            Self::InvalidEmail { .. } => "invalid_email",
            Self::DuplicateSkill { .. } => "duplicate_skill",
            Self::InvalidSchema(_) => "invalid_schema",
        }
    }

    /// Create missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_error_display() {
        let err = ValidationError::RatingOutOfRange {
            skill: "Python".to_string(),
            value: 7,
        };
        assert_eq!(err.to_string(), "rating 7 for 'Python' is outside 1..=5");
        assert_eq!(err.kind(), "rating_out_of_range");
    }

    #[test]
    fn gap_error_mentions_expected_value() {
        let err = ValidationError::GapInconsistent {
            skill: "SQL".to_string(),
            gap: 2,
            expected: Some(-1),
        };
        assert!(err.to_string().contains("expected -1"));

        let err = ValidationError::GapInconsistent {
            skill: "SQL".to_string(),
            gap: 2,
            expected: None,
        };
        assert!(err.to_string().contains("not manager-rated"));
    }
}
