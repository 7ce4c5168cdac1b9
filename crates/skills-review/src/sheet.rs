//! Gap reconciliation
//!
//! [`reconcile`] merges a stored response with the taxonomy into one
//! [`SkillReview`] per skill, ordered for display. Manager edits are applied
//! to the resulting [`ReviewSheet`] and [`to_persistable`] turns the records
//! back into the fields the store writes.
//!
//! Expectation precedence is persisted override, then taxonomy default, then
//! the employee's own rating.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use skills_model::{
    Level, ManagerReview, Rating, RatingGap, ResponseId, SkillExpectation, SkillRating,
    SurveyResponse,
};
use skills_taxonomy::Taxonomy;
use tracing::debug;

use crate::error::{ReviewError, ReviewResult};
use crate::record::SkillReview;

/// Reconciled review of one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSheet {
    response_id: ResponseId,
    records: Vec<SkillReview>,
    titles: HashMap<String, String>,
    overall: Option<String>,
}

/// Records of one section, for navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionView<'a> {
    pub key: &'a str,
    pub title: &'a str,
    pub records: &'a [SkillReview],
}

/// Build the review sheet for `response`
#[must_use]
pub fn reconcile(response: &SurveyResponse, taxonomy: &Taxonomy) -> ReviewSheet {
    let completed = response.review_completed();

    let mut records: Vec<SkillReview> = response
        .skills_under_review()
        .into_iter()
        .map(|skill| {
            let self_rating = response.self_rating(skill);
            let expectation = response
                .expectation(skill)
                .unwrap_or(Rating::Unrated)
                .or(taxonomy
                    .default_expectation(skill)
                    .map_or(Rating::Unrated, Rating::from))
                .or(self_rating);
            let manager_rating = if completed {
                response.manager_rating(skill)
            } else {
                Rating::Unrated
            };

            SkillReview {
                skill: skill.to_string(),
                section: taxonomy.section_of(skill).to_string(),
                self_rating,
                expectation,
                manager_rating,
            }
        })
        .collect();

    records.sort_by(|a, b| display_order(taxonomy, a, b));

    let titles = records
        .iter()
        .map(|r| (r.section.clone(), taxonomy.title_of(&r.section).to_string()))
        .collect();

    debug!(
        id = %response.id,
        records = records.len(),
        completed,
        "Reconciled review sheet"
    );

    ReviewSheet {
        response_id: response.id,
        records,
        titles,
        overall: response.overall_manager_review.clone(),
    }
}

// Listed skills by (section, slot); unlisted skills last, alphabetically.
fn display_order(taxonomy: &Taxonomy, a: &SkillReview, b: &SkillReview) -> Ordering {
    match (taxonomy.position(&a.skill), taxonomy.position(&b.skill)) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.skill.cmp(&b.skill),
    }
}

/// Persistable review fields for `reviews`
///
/// Every known expectation is written, including those of skills the
/// manager left unrated. Ratings and gaps are written only for rated skills.
#[must_use]
pub fn to_persistable(reviews: &[SkillReview], overall: Option<String>) -> ManagerReview {
    let mut review = ManagerReview {
        overall_manager_review: overall,
        ..ManagerReview::default()
    };

    for record in reviews {
        if let Some(level) = record.expectation.level() {
            review
                .company_expectations
                .push(SkillExpectation::new(record.skill.clone(), level));
        }
        if let (Some(level), Some(gap)) = (record.manager_rating.level(), record.gap()) {
            review
                .manager_ratings
                .push(SkillRating::new(record.skill.clone(), level));
            review.rating_gaps.push(RatingGap {
                skill: record.skill.clone(),
                gap,
            });
        }
    }

    review
}

impl ReviewSheet {
    /// Response this sheet was built from
    #[inline]
    #[must_use]
    pub fn response_id(&self) -> ResponseId {
        self.response_id
    }

    /// All records in display order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[SkillReview] {
        &self.records
    }

    /// First record for `skill`, in any section
    #[must_use]
    pub fn record(&self, skill: &str) -> Option<&SkillReview> {
        self.records.iter().find(|r| r.skill == skill)
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the response named no skills
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Overall free-text review
    #[must_use]
    pub fn overall(&self) -> Option<&str> {
        self.overall.as_deref()
    }

    /// Sections holding at least one record, in display order
    #[must_use]
    pub fn sections(&self) -> Vec<SectionView<'_>> {
        let mut views = Vec::new();
        let mut start = 0;
        while start < self.records.len() {
            let key = self.records[start].section.as_str();
            let len = self.records[start..]
                .iter()
                .take_while(|r| r.section == key)
                .count();
            views.push(SectionView {
                key,
                title: self.titles.get(key).map_or(key, String::as_str),
                records: &self.records[start..start + len],
            });
            start += len;
        }
        views
    }

    /// Set the manager rating of the record for `skill` in `section`
    ///
    /// # Errors
    /// Returns [`ReviewError::UnknownSkill`] if no record matches; the sheet
    /// is left unchanged.
    pub fn apply_manager_rating(
        &mut self,
        skill: &str,
        section: &str,
        level: Level,
    ) -> ReviewResult<&SkillReview> {
        let record = self.find_mut(skill, section)?;
        record.manager_rating = Rating::Rated(level);
        Ok(&*record)
    }

    /// Override the expectation of the record for `skill` in `section`
    ///
    /// # Errors
    /// Returns [`ReviewError::UnknownSkill`] if no record matches.
    pub fn set_expectation(
        &mut self,
        skill: &str,
        section: &str,
        level: Level,
    ) -> ReviewResult<&SkillReview> {
        let record = self.find_mut(skill, section)?;
        record.expectation = Rating::Rated(level);
        Ok(&*record)
    }

    /// Remove the manager rating of the record for `skill` in `section`
    ///
    /// # Errors
    /// Returns [`ReviewError::UnknownSkill`] if no record matches.
    pub fn clear_manager_rating(&mut self, skill: &str, section: &str) -> ReviewResult<&SkillReview> {
        let record = self.find_mut(skill, section)?;
        record.manager_rating = Rating::Unrated;
        Ok(&*record)
    }

    /// Replace the overall free-text review
    pub fn set_overall(&mut self, overall: Option<String>) {
        self.overall = overall;
    }

    /// Persistable fields for the current records
    #[must_use]
    pub fn to_persistable(&self) -> ManagerReview {
        to_persistable(&self.records, self.overall.clone())
    }

    fn find_mut(&mut self, skill: &str, section: &str) -> ReviewResult<&mut SkillReview> {
        self.records
            .iter_mut()
            .find(|r| r.matches(skill, section))
            .ok_or_else(|| ReviewError::unknown_skill(skill, section))
    }
}
