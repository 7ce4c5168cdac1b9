//! Testing utilities for the skills review workspace
//!
//! Shared fixtures: a small taxonomy and survey response builders.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use skills_model::{
    ManagerReview, NewSurveyResponse, RatingGap, ResponseId, SkillRating, SurveyResponse,
};
use skills_taxonomy::{Section, Taxonomy, TaxonomyConfig};

/// Fixed submission time so fixtures compare equal across runs
pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
}

/// Two sections, two defaults: Python expects 4, SQL expects 2
pub fn create_test_taxonomy() -> Taxonomy {
    let config = TaxonomyConfig {
        sections: vec![
            Section::new("programming", "Programming", ["Python", "Java", "Go"]),
            Section::new("data-analytics", "Data Analytics", ["SQL", "Excel"]),
        ],
        expectations: [("Python".to_string(), 4), ("SQL".to_string(), 2)]
            .into_iter()
            .collect(),
    };
    Taxonomy::new(config).unwrap()
}

pub fn skill_ratings(ratings: &[(&str, u8)]) -> Vec<SkillRating> {
    ratings
        .iter()
        .map(|(skill, rating)| SkillRating {
            skill: (*skill).to_string(),
            rating: *rating,
        })
        .collect()
}

pub fn create_intake(name: &str) -> NewSurveyResponse {
    NewSurveyResponse {
        name: name.to_string(),
        employee_id: format!("EMP-{}", name.len()),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        ..NewSurveyResponse::default()
    }
}

/// Intake where every rated skill is also selected
pub fn create_intake_with_ratings(name: &str, ratings: &[(&str, u8)]) -> NewSurveyResponse {
    NewSurveyResponse {
        selected_skills: ratings.iter().map(|(skill, _)| (*skill).to_string()).collect(),
        skill_ratings: skill_ratings(ratings),
        ..create_intake(name)
    }
}

pub fn create_response(ratings: &[(&str, u8)]) -> SurveyResponse {
    SurveyResponse::from_intake(
        ResponseId::new(),
        create_intake_with_ratings("Test Employee", ratings),
        fixed_timestamp(),
    )
}

/// Response with an explicit selection, which may include unrated skills
pub fn create_response_with_selection(selected: &[&str], ratings: &[(&str, u8)]) -> SurveyResponse {
    let intake = NewSurveyResponse {
        selected_skills: selected.iter().map(|s| (*s).to_string()).collect(),
        skill_ratings: skill_ratings(ratings),
        ..create_intake("Test Employee")
    };
    SurveyResponse::from_intake(ResponseId::new(), intake, fixed_timestamp())
}

/// Review with gaps computed against `response`, an unrated self rating counting as zero
pub fn create_review(response: &SurveyResponse, manager: &[(&str, u8)]) -> ManagerReview {
    ManagerReview {
        manager_ratings: skill_ratings(manager),
        rating_gaps: manager
            .iter()
            .map(|(skill, rating)| {
                let own = response.self_rating(skill).value();
                RatingGap {
                    skill: (*skill).to_string(),
                    gap: i8::try_from(*rating).unwrap() - i8::try_from(own).unwrap(),
                }
            })
            .collect(),
        ..ManagerReview::default()
    }
}
