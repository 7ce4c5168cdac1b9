//! Boundary validation for manager reviews
//!
//! The review engine is tolerant of odd stored data; this is the place where
//! a review is checked strictly before it replaces what is stored.

use std::collections::{HashMap, HashSet};

use skills_model::{Level, ManagerReview, Rating, SurveyResponse, ValidationError};

use crate::error::{StoreError, StoreResult};

/// Validate `review` against the response it will be written to
///
/// Checks, in order: manager rating bounds and duplicates, expectation bounds
/// and duplicates, that every rated skill belongs to the response, and that
/// `rating_gaps` holds exactly one consistent gap per manager-rated skill.
/// An unrated self-assessment counts as zero in the gap.
///
/// # Errors
/// Returns the first violation found.
pub fn validate_manager_review(response: &SurveyResponse, review: &ManagerReview) -> StoreResult<()> {
    let mut rated: HashMap<&str, u8> = HashMap::new();
    for entry in &review.manager_ratings {
        if !Level::is_valid(entry.rating) {
            return Err(ValidationError::RatingOutOfRange {
                skill: entry.skill.clone(),
                value: entry.rating,
            }
            .into());
        }
        if rated.insert(entry.skill.as_str(), entry.rating).is_some() {
            return Err(duplicate(&entry.skill, "manager_ratings"));
        }
    }

    let mut expected = HashSet::new();
    for entry in &review.company_expectations {
        if !Level::is_valid(entry.expectation) {
            return Err(ValidationError::ExpectationOutOfRange {
                skill: entry.skill.clone(),
                value: entry.expectation,
            }
            .into());
        }
        if !expected.insert(entry.skill.as_str()) {
            return Err(duplicate(&entry.skill, "company_expectations"));
        }
    }

    for entry in &review.manager_ratings {
        if !response.has_skill(&entry.skill) {
            return Err(StoreError::Conflict {
                id: response.id,
                skill: entry.skill.clone(),
            });
        }
    }

    let mut gapped = HashSet::new();
    for entry in &review.rating_gaps {
        if !gapped.insert(entry.skill.as_str()) {
            return Err(duplicate(&entry.skill, "rating_gaps"));
        }
        let expected = rated.get(entry.skill.as_str()).and_then(|manager| {
            Rating::from_stored(*manager).gap_from(response.self_rating(&entry.skill))
        });
        if expected != Some(entry.gap) {
            return Err(ValidationError::GapInconsistent {
                skill: entry.skill.clone(),
                gap: entry.gap,
                expected,
            }
            .into());
        }
    }

    if let Some(missing) = review
        .manager_ratings
        .iter()
        .find(|entry| !gapped.contains(entry.skill.as_str()))
    {
        return Err(ValidationError::missing(format!("rating_gaps[{}]", missing.skill)).into());
    }

    Ok(())
}

fn duplicate(skill: &str, list: &'static str) -> StoreError {
    ValidationError::DuplicateSkill {
        skill: skill.to_string(),
        list,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skills_model::{
        NewSurveyResponse, RatingGap, ResponseId, SkillExpectation, SkillRating,
    };

    fn response() -> SurveyResponse {
        let intake = NewSurveyResponse {
            name: "Ana".to_string(),
            employee_id: "E1".to_string(),
            email: "ana@example.com".to_string(),
            selected_skills: vec!["Python".to_string(), "Docker".to_string()],
            skill_ratings: vec![SkillRating {
                skill: "Python".to_string(),
                rating: 3,
            }],
            additional_skills: None,
        };
        SurveyResponse::from_intake(ResponseId::new(), intake, Utc::now())
    }

    fn rating(skill: &str, value: u8) -> SkillRating {
        SkillRating {
            skill: skill.to_string(),
            rating: value,
        }
    }

    fn gap(skill: &str, value: i8) -> RatingGap {
        RatingGap {
            skill: skill.to_string(),
            gap: value,
        }
    }

    #[test]
    fn accepts_consistent_review() {
        let review = ManagerReview {
            manager_ratings: vec![rating("Python", 4)],
            company_expectations: vec![SkillExpectation {
                skill: "Python".to_string(),
                expectation: 4,
            }],
            rating_gaps: vec![gap("Python", 1)],
            overall_manager_review: Some("Solid".to_string()),
        };
        assert_eq!(validate_manager_review(&response(), &review), Ok(()));
    }

    #[test]
    fn selected_but_unrated_skill_gaps_against_zero() {
        let review = ManagerReview {
            manager_ratings: vec![rating("Docker", 2)],
            rating_gaps: vec![gap("Docker", 2)],
            ..ManagerReview::default()
        };
        assert_eq!(validate_manager_review(&response(), &review), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let review = ManagerReview {
            manager_ratings: vec![rating("Python", 6)],
            rating_gaps: vec![gap("Python", 3)],
            ..ManagerReview::default()
        };
        let err = validate_manager_review(&response(), &review).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::RatingOutOfRange { value: 6, .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_expectation() {
        let review = ManagerReview {
            company_expectations: vec![SkillExpectation {
                skill: "Python".to_string(),
                expectation: 0,
            }],
            ..ManagerReview::default()
        };
        let err = validate_manager_review(&response(), &review).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::ExpectationOutOfRange { value: 0, .. })
        ));
    }

    #[test]
    fn rejects_unknown_skill_as_conflict() {
        let review = ManagerReview {
            manager_ratings: vec![rating("Rust", 4)],
            rating_gaps: vec![gap("Rust", 4)],
            ..ManagerReview::default()
        };
        let err = validate_manager_review(&response(), &review).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { ref skill, .. } if skill == "Rust"));
    }

    #[test]
    fn rejects_inconsistent_gap() {
        let review = ManagerReview {
            manager_ratings: vec![rating("Python", 4)],
            rating_gaps: vec![gap("Python", 2)],
            ..ManagerReview::default()
        };
        let err = validate_manager_review(&response(), &review).unwrap_err();
        assert_eq!(
            err,
            StoreError::Validation(ValidationError::GapInconsistent {
                skill: "Python".to_string(),
                gap: 2,
                expected: Some(1),
            })
        );
    }

    #[test]
    fn rejects_gap_without_manager_rating() {
        let review = ManagerReview {
            rating_gaps: vec![gap("Python", 1)],
            ..ManagerReview::default()
        };
        let err = validate_manager_review(&response(), &review).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::GapInconsistent { expected: None, .. })
        ));
    }

    #[test]
    fn rejects_missing_gap() {
        let review = ManagerReview {
            manager_ratings: vec![rating("Python", 4)],
            ..ManagerReview::default()
        };
        let err = validate_manager_review(&response(), &review).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::MissingField(_))
        ));
    }

    #[test]
    fn rejects_duplicate_manager_rating() {
        let review = ManagerReview {
            manager_ratings: vec![rating("Python", 4), rating("Python", 5)],
            rating_gaps: vec![gap("Python", 1)],
            ..ManagerReview::default()
        };
        let err = validate_manager_review(&response(), &review).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::DuplicateSkill {
                list: "manager_ratings",
                ..
            })
        ));
    }

    #[test]
    fn empty_review_is_valid() {
        assert_eq!(
            validate_manager_review(&response(), &ManagerReview::default()),
            Ok(())
        );
    }
}
