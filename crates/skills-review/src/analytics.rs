//! Skill analytics across all responses
//!
//! A pure fold over the stored responses. Averages are `None` when nothing
//! contributed to them, never zero.

use indexmap::IndexMap;
use serde::Serialize;
use skills_model::SurveyResponse;
use skills_taxonomy::{Taxonomy, OTHER_SECTION};

/// Aggregates for one skill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillStats {
    pub skill: String,
    pub section: String,
    /// Employees who selected the skill
    pub selected_count: usize,
    /// Employees who gave themselves a rating
    pub rated_count: usize,
    pub average_self_rating: Option<f64>,
    /// Completed reviews that rated the skill
    pub manager_rated_count: usize,
    pub average_manager_rating: Option<f64>,
    /// Mean of manager minus self, over reviews where both are rated
    pub average_gap: Option<f64>,
}

/// Aggregates for one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStats {
    pub section: String,
    pub title: String,
    /// Distinct skills seen in the section
    pub skill_count: usize,
    /// Sum of the section's per-skill selection counts
    pub selected_count: usize,
}

/// Analytics over a set of responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub total_responses: usize,
    pub reviewed_responses: usize,
    /// Skills in first-seen order
    pub skills: Vec<SkillStats>,
    /// Sections in taxonomy order, unlisted skills last
    pub sections: Vec<SectionStats>,
}

#[derive(Default)]
struct Tally {
    selected: usize,
    self_sum: u32,
    self_count: usize,
    manager_sum: u32,
    manager_count: usize,
    gap_sum: i32,
    gap_count: usize,
}

impl Tally {
    fn add(&mut self, response: &SurveyResponse, skill: &str, selected: bool) {
        if selected {
            self.selected += 1;
        }

        let own = response.self_rating(skill);
        if let Some(level) = own.level() {
            self.self_sum += u32::from(level.get());
            self.self_count += 1;
        }

        if !response.review_completed() {
            return;
        }
        let manager = response.manager_rating(skill);
        if let Some(level) = manager.level() {
            self.manager_sum += u32::from(level.get());
            self.manager_count += 1;
        }
        if own.is_rated() {
            if let Some(gap) = manager.gap_from(own) {
                self.gap_sum += i32::from(gap);
                self.gap_count += 1;
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

/// Compute analytics for `responses`
#[must_use]
pub fn analyze(responses: &[SurveyResponse], taxonomy: &Taxonomy) -> AnalyticsReport {
    let mut tallies: IndexMap<&str, Tally> = IndexMap::new();

    for response in responses {
        for skill in response.skills_under_review() {
            let selected = response.selected_skills.iter().any(|s| s == skill);
            tallies.entry(skill).or_default().add(response, skill, selected);
        }
    }

    let skills: Vec<SkillStats> = tallies
        .into_iter()
        .map(|(skill, t)| SkillStats {
            skill: skill.to_string(),
            section: taxonomy.section_of(skill).to_string(),
            selected_count: t.selected,
            rated_count: t.self_count,
            average_self_rating: mean(f64::from(t.self_sum), t.self_count),
            manager_rated_count: t.manager_count,
            average_manager_rating: mean(f64::from(t.manager_sum), t.manager_count),
            average_gap: mean(f64::from(t.gap_sum), t.gap_count),
        })
        .collect();

    AnalyticsReport {
        total_responses: responses.len(),
        reviewed_responses: responses.iter().filter(|r| r.review_completed()).count(),
        sections: section_stats(&skills, taxonomy),
        skills,
    }
}

fn section_stats(skills: &[SkillStats], taxonomy: &Taxonomy) -> Vec<SectionStats> {
    let keys = taxonomy
        .sections()
        .iter()
        .map(|s| s.key.as_str())
        .chain(std::iter::once(OTHER_SECTION));

    keys.filter_map(|key| {
        let members: Vec<_> = skills.iter().filter(|s| s.section == key).collect();
        (!members.is_empty()).then(|| SectionStats {
            section: key.to_string(),
            title: taxonomy.title_of(key).to_string(),
            skill_count: members.len(),
            selected_count: members.iter().map(|s| s.selected_count).sum(),
        })
    })
    .collect()
}

impl AnalyticsReport {
    /// The `n` most selected skills; ties keep first-seen order
    #[must_use]
    pub fn top_by_count(&self, n: usize) -> Vec<&SkillStats> {
        let mut ranked: Vec<&SkillStats> = self.skills.iter().collect();
        ranked.sort_by(|a, b| b.selected_count.cmp(&a.selected_count));
        ranked.truncate(n);
        ranked
    }

    /// Stats for one skill
    #[must_use]
    pub fn skill(&self, name: &str) -> Option<&SkillStats> {
        self.skills.iter().find(|s| s.skill == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use skills_test_utils::{
        create_response, create_response_with_selection, create_review, create_test_taxonomy,
    };

    #[test]
    fn counts_and_averages() {
        let taxonomy = create_test_taxonomy();
        let responses = vec![
            create_response(&[("Python", 4), ("SQL", 2)]),
            create_response(&[("Python", 2)]),
            create_response_with_selection(&["Excel"], &[]),
        ];
        let report = analyze(&responses, &taxonomy);

        assert_eq!(report.total_responses, 3);
        assert_eq!(report.reviewed_responses, 0);

        let python = report.skill("Python").unwrap();
        assert_eq!(python.selected_count, 2);
        assert_eq!(python.average_self_rating, Some(3.0));
        assert_eq!(python.average_manager_rating, None);

        let excel = report.skill("Excel").unwrap();
        assert_eq!(excel.selected_count, 1);
        assert_eq!(excel.rated_count, 0);
        assert_eq!(excel.average_self_rating, None);
    }

    #[test]
    fn manager_aggregates_use_completed_reviews_only() {
        let taxonomy = create_test_taxonomy();
        let mut reviewed = create_response(&[("Python", 3)]);
        reviewed.apply_review(create_review(&reviewed, &[("Python", 5)]));
        let responses = vec![reviewed, create_response(&[("Python", 1)])];

        let report = analyze(&responses, &taxonomy);
        let python = report.skill("Python").unwrap();
        assert_eq!(report.reviewed_responses, 1);
        assert_eq!(python.manager_rated_count, 1);
        assert_eq!(python.average_manager_rating, Some(5.0));
        assert_eq!(python.average_gap, Some(2.0));
        assert_eq!(python.average_self_rating, Some(2.0));
    }

    #[test]
    fn top_by_count_is_stable_on_ties() {
        let taxonomy = create_test_taxonomy();
        let responses = vec![
            create_response(&[("Go", 3), ("SQL", 2)]),
            create_response(&[("Excel", 3), ("SQL", 4)]),
        ];
        let report = analyze(&responses, &taxonomy);

        let top: Vec<_> = report.top_by_count(3).iter().map(|s| s.skill.as_str()).collect();
        assert_eq!(top, vec!["SQL", "Go", "Excel"]);
        assert_eq!(report.top_by_count(1).len(), 1);
    }

    #[test]
    fn sections_in_taxonomy_order_with_other_last() {
        let taxonomy = create_test_taxonomy();
        let responses = vec![create_response(&[("Rust", 5), ("SQL", 2), ("Python", 4)])];
        let report = analyze(&responses, &taxonomy);

        let keys: Vec<_> = report.sections.iter().map(|s| s.section.as_str()).collect();
        assert_eq!(keys, vec!["programming", "data-analytics", "other"]);
        assert_eq!(report.sections[2].title, "Other Skills");
    }

    #[test]
    fn empty_input() {
        let report = analyze(&[], &create_test_taxonomy());
        assert_eq!(report.total_responses, 0);
        assert!(report.skills.is_empty());
        assert!(report.sections.is_empty());
        assert!(report.top_by_count(5).is_empty());
    }
}
