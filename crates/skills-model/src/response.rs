//! Survey response documents
//!
//! One [`SurveyResponse`] per employee submission. Intake fills the core
//! fields once; the manager review later fills the review fields and may
//! overwrite them when the review is re-opened.

use crate::error::ValidationError;
use crate::rating::{Level, Rating};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use ulid::Ulid;

/// Opaque response identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(pub Ulid);

impl ResponseId {
    /// Generate new response ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ResponseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResponseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResponseId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

/// `{skill, rating}` entry, used for both self and manager ratings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillRating {
    pub skill: String,
    pub rating: u8,
}

impl SkillRating {
    pub fn new(skill: impl Into<String>, rating: Level) -> Self {
        Self {
            skill: skill.into(),
            rating: rating.get(),
        }
    }
}

/// `{skill, expectation}` entry persisted per response
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillExpectation {
    pub skill: String,
    pub expectation: u8,
}

impl SkillExpectation {
    pub fn new(skill: impl Into<String>, expectation: Level) -> Self {
        Self {
            skill: skill.into(),
            expectation: expectation.get(),
        }
    }
}

/// `{skill, gap}` entry, `gap = manager − self`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatingGap {
    pub skill: String,
    pub gap: i8,
}

/// Intake rules that depend on deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakePolicy {
    /// Corporate domain that must appear in the email, if any
    pub email_domain: Option<String>,
}

impl IntakePolicy {
    /// Policy requiring the given email domain
    #[must_use]
    pub fn with_email_domain(domain: impl Into<String>) -> Self {
        Self {
            email_domain: Some(domain.into()),
        }
    }
}

/// Employee submission as received from the intake form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSurveyResponse {
    pub name: String,
    pub employee_id: String,
    pub email: String,
    #[serde(default)]
    pub selected_skills: Vec<String>,
    #[serde(default)]
    pub skill_ratings: Vec<SkillRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_skills: Option<String>,
}

impl NewSurveyResponse {
    /// Trim identity fields and skill names, drop repeated selected skills
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.employee_id = self.employee_id.trim().to_string();
        self.email = self.email.trim().to_string();
        for skill in &mut self.selected_skills {
            *skill = skill.trim().to_string();
        }
        let mut seen = HashSet::new();
        self.selected_skills
            .retain(|skill| !skill.is_empty() && seen.insert(skill.clone()));
        for entry in &mut self.skill_ratings {
            entry.skill = entry.skill.trim().to_string();
        }
        self
    }

    /// Validate against intake rules
    ///
    /// # Errors
    /// Returns the first rule violated.
    pub fn validate(&self, policy: &IntakePolicy) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("employee_id", &self.employee_id),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::missing(field));
            }
        }

        validate_email(&self.email, policy)?;

        let mut seen = HashSet::new();
        for entry in &self.skill_ratings {
            if !Level::is_valid(entry.rating) {
                return Err(ValidationError::RatingOutOfRange {
                    skill: entry.skill.clone(),
                    value: entry.rating,
                });
            }
            if !seen.insert(entry.skill.as_str()) {
                return Err(ValidationError::DuplicateSkill {
                    skill: entry.skill.clone(),
                    list: "skill_ratings",
                });
            }
        }

        Ok(())
    }
}

fn validate_email(email: &str, policy: &IntakePolicy) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidEmail {
        email: email.to_string(),
        reason: reason.to_string(),
    };

    let Some((local, host)) = email.split_once('@') else {
        return Err(invalid("missing '@'"));
    };
    if local.is_empty() || host.is_empty() {
        return Err(invalid("empty local part or domain"));
    }

    if let Some(domain) = policy.email_domain.as_deref() {
        if !email.to_lowercase().contains(&domain.to_lowercase()) {
            return Err(invalid(&format!("must use the {domain} domain")));
        }
    }

    Ok(())
}

/// Partial update of intake fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseUpdate {
    pub name: Option<String>,
    pub employee_id: Option<String>,
    pub email: Option<String>,
    pub selected_skills: Option<Vec<String>>,
    pub skill_ratings: Option<Vec<SkillRating>>,
    pub additional_skills: Option<String>,
}

impl ResponseUpdate {
    /// Check if nothing would change
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Review fields written by the manager-review flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerReview {
    #[serde(default)]
    pub manager_ratings: Vec<SkillRating>,
    #[serde(default)]
    pub company_expectations: Vec<SkillExpectation>,
    #[serde(default)]
    pub rating_gaps: Vec<RatingGap>,
    #[serde(default)]
    pub overall_manager_review: Option<String>,
}

/// Stored survey response document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: ResponseId,
    pub name: String,
    pub employee_id: String,
    pub email: String,
    #[serde(default)]
    pub selected_skills: Vec<String>,
    #[serde(default)]
    pub skill_ratings: Vec<SkillRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_skills: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manager_ratings: Vec<SkillRating>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub company_expectations: Vec<SkillExpectation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rating_gaps: Vec<RatingGap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_manager_review: Option<String>,
}

impl SurveyResponse {
    /// Build the stored document for a new submission
    #[must_use]
    pub fn from_intake(id: ResponseId, intake: NewSurveyResponse, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            name: intake.name,
            employee_id: intake.employee_id,
            email: intake.email,
            selected_skills: intake.selected_skills,
            skill_ratings: intake.skill_ratings,
            additional_skills: intake.additional_skills,
            timestamp,
            manager_ratings: Vec::new(),
            company_expectations: Vec::new(),
            rating_gaps: Vec::new(),
            overall_manager_review: None,
        }
    }

    /// A review is complete once any manager rating is stored
    #[inline]
    #[must_use]
    pub fn review_completed(&self) -> bool {
        !self.manager_ratings.is_empty()
    }

    /// Employee's own rating for `skill`
    #[must_use]
    pub fn self_rating(&self, skill: &str) -> Rating {
        find_rating(&self.skill_ratings, skill)
    }

    /// Stored manager rating for `skill`
    #[must_use]
    pub fn manager_rating(&self, skill: &str) -> Rating {
        find_rating(&self.manager_ratings, skill)
    }

    /// Persisted per-response expectation for `skill`
    #[must_use]
    pub fn expectation(&self, skill: &str) -> Option<Rating> {
        self.company_expectations
            .iter()
            .find(|e| e.skill == skill)
            .map(|e| Rating::from_stored(e.expectation))
    }

    /// Union of selected and rated skills, first occurrence order
    #[must_use]
    pub fn skills_under_review(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.selected_skills
            .iter()
            .map(String::as_str)
            .chain(self.skill_ratings.iter().map(|r| r.skill.as_str()))
            .filter(|skill| seen.insert(*skill))
            .collect()
    }

    /// Whether the employee selected or rated `skill`
    #[must_use]
    pub fn has_skill(&self, skill: &str) -> bool {
        self.selected_skills.iter().any(|s| s == skill)
            || self.skill_ratings.iter().any(|r| r.skill == skill)
    }

    /// Overwrite the review fields
    pub fn apply_review(&mut self, review: ManagerReview) {
        self.manager_ratings = review.manager_ratings;
        self.company_expectations = review.company_expectations;
        self.rating_gaps = review.rating_gaps;
        self.overall_manager_review = review.overall_manager_review;
    }

    /// Re-derive `rating_gaps` from the stored manager and self ratings
    ///
    /// Manager ratings on skills the employee no longer selected or rated
    /// are dropped with their gaps. Returns the dropped skills.
    pub fn refresh_gaps(&mut self) -> Vec<String> {
        let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.manager_ratings)
            .into_iter()
            .partition(|entry| self.has_skill(&entry.skill));

        self.rating_gaps = kept
            .iter()
            .filter_map(|entry| {
                Rating::from_stored(entry.rating)
                    .gap_from(self.self_rating(&entry.skill))
                    .map(|gap| RatingGap {
                        skill: entry.skill.clone(),
                        gap,
                    })
            })
            .collect();
        self.manager_ratings = kept;
        dropped.into_iter().map(|entry| entry.skill).collect()
    }

    /// Current review fields
    #[must_use]
    pub fn review(&self) -> ManagerReview {
        ManagerReview {
            manager_ratings: self.manager_ratings.clone(),
            company_expectations: self.company_expectations.clone(),
            rating_gaps: self.rating_gaps.clone(),
            overall_manager_review: self.overall_manager_review.clone(),
        }
    }

    /// Apply a partial intake update; `id` and `timestamp` never change
    pub fn apply_update(&mut self, update: ResponseUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(employee_id) = update.employee_id {
            self.employee_id = employee_id;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(selected) = update.selected_skills {
            self.selected_skills = selected;
        }
        if let Some(ratings) = update.skill_ratings {
            self.skill_ratings = ratings;
        }
        if let Some(additional) = update.additional_skills {
            self.additional_skills = Some(additional);
        }
    }

    /// Intake fields, for re-validation after an update
    #[must_use]
    pub fn intake(&self) -> NewSurveyResponse {
        NewSurveyResponse {
            name: self.name.clone(),
            employee_id: self.employee_id.clone(),
            email: self.email.clone(),
            selected_skills: self.selected_skills.clone(),
            skill_ratings: self.skill_ratings.clone(),
            additional_skills: self.additional_skills.clone(),
        }
    }
}

fn find_rating(entries: &[SkillRating], skill: &str) -> Rating {
    entries
        .iter()
        .find(|r| r.skill == skill)
        .map_or(Rating::Unrated, |r| Rating::from_stored(r.rating))
}
