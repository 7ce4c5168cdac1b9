//! Per-skill review record

use std::fmt;

use serde::Serialize;
use skills_model::Rating;

/// One skill as seen by the reviewing manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillReview {
    /// Skill name
    pub skill: String,
    /// Taxonomy section key, `"other"` if unlisted
    pub section: String,
    /// Employee's own rating
    pub self_rating: Rating,
    /// Target level: persisted override, taxonomy default, or the self rating
    pub expectation: Rating,
    /// Manager's rating, unrated until reviewed
    pub manager_rating: Rating,
}

impl SkillReview {
    /// Manager rating minus self rating; `None` until the manager rates
    ///
    /// An unrated self-assessment counts as zero.
    #[inline]
    #[must_use]
    pub fn gap(&self) -> Option<i8> {
        self.manager_rating.gap_from(self.self_rating)
    }

    /// How the manager's view compares with the employee's
    #[must_use]
    pub fn status(&self) -> GapStatus {
        match (self.manager_rating.is_rated(), self.self_rating.is_rated()) {
            (false, _) => GapStatus::NotRated,
            (true, false) => GapStatus::SelfUnrated,
            (true, true) => match self.gap() {
                Some(gap) if gap > 0 => GapStatus::Exceeds,
                Some(0) => GapStatus::Meets,
                _ => GapStatus::Below,
            },
        }
    }

    /// Check if `skill`/`section` identify this record
    #[inline]
    #[must_use]
    pub fn matches(&self, skill: &str, section: &str) -> bool {
        self.skill == skill && self.section == section
    }
}

/// Gap category shown next to each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapStatus {
    /// Manager has not rated the skill
    NotRated,
    /// Manager rated a skill the employee selected but never rated
    SelfUnrated,
    /// Manager rated higher than the employee
    Exceeds,
    /// Ratings agree
    Meets,
    /// Manager rated lower than the employee
    Below,
}

impl fmt::Display for GapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotRated => "not rated",
            Self::SelfUnrated => "no self rating",
            Self::Exceeds => "exceeds",
            Self::Meets => "meets",
            Self::Below => "below",
        };
        f.write_str(label)
    }
}
