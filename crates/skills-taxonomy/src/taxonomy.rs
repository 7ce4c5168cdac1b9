//! Skill taxonomy tables
//!
//! Maps each skill to exactly one section and, optionally, to a default
//! expectation. Skills found in no section belong to [`OTHER_SECTION`].

use crate::error::{TaxonomyError, TaxonomyIssue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use skills_model::Level;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Section key for skills that appear in no section
pub const OTHER_SECTION: &str = "other";

/// Display title of [`OTHER_SECTION`]
pub const OTHER_TITLE: &str = "Other Skills";

/// A named group of skills in fixed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Stable key used in records and URLs
    pub key: String,
    /// Display title
    pub title: String,
    /// Member skills in display order
    pub skills: Vec<String>,
}

impl Section {
    /// Create a section
    pub fn new<I, S>(key: impl Into<String>, title: impl Into<String>, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            title: title.into(),
            skills: skills.into_iter().map(Into::into).collect(),
        }
    }
}

/// Serialized form of a taxonomy (YAML or JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Sections in display order
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Default expectation per skill
    #[serde(default)]
    pub expectations: IndexMap<String, u8>,
}

/// Where a skill sits in the taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SkillPosition {
    /// Index of the section
    pub section: usize,
    /// Index of the skill within the section
    pub slot: usize,
}

/// Read-only skill taxonomy
///
/// Built once and injected wherever sections or expectation defaults are
/// needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    sections: Vec<Section>,
    positions: HashMap<String, SkillPosition>,
    expectations: IndexMap<String, Level>,
}

impl Taxonomy {
    /// Build from config, rejecting any data issue
    ///
    /// # Errors
    /// Returns [`TaxonomyError::Invalid`] listing every issue found.
    pub fn new(config: TaxonomyConfig) -> Result<Self, TaxonomyError> {
        let (taxonomy, issues) = Self::lenient(config);
        if issues.is_empty() {
            Ok(taxonomy)
        } else {
            Err(TaxonomyError::Invalid(issues))
        }
    }

    /// Build from config, keeping the first of any conflicting entries
    ///
    /// Returns the usable taxonomy together with the issues that were
    /// skipped over.
    #[must_use]
    pub fn lenient(config: TaxonomyConfig) -> (Self, Vec<TaxonomyIssue>) {
        let mut issues = Vec::new();
        let mut sections: Vec<Section> = Vec::with_capacity(config.sections.len());
        let mut positions: HashMap<String, SkillPosition> = HashMap::new();
        let mut keys = HashSet::new();

        for section in config.sections {
            let key = section.key.trim();
            if key.is_empty() {
                issues.push(TaxonomyIssue::BlankSectionKey);
                continue;
            }
            if key == OTHER_SECTION {
                issues.push(TaxonomyIssue::ReservedSectionKey(key.to_string()));
                continue;
            }
            if !keys.insert(key.to_string()) {
                issues.push(TaxonomyIssue::DuplicateSection(key.to_string()));
                continue;
            }

            let index = sections.len();
            let mut skills = Vec::with_capacity(section.skills.len());
            for skill in section.skills {
                if let Some(existing) = positions.get(&skill) {
                    issues.push(TaxonomyIssue::DuplicateMembership {
                        first: section_key(&sections, key, existing.section),
                        second: key.to_string(),
                        skill,
                    });
                    continue;
                }
                positions.insert(
                    skill.clone(),
                    SkillPosition {
                        section: index,
                        slot: skills.len(),
                    },
                );
                skills.push(skill);
            }

            sections.push(Section {
                key: key.to_string(),
                title: section.title,
                skills,
            });
        }

        let mut expectations = IndexMap::with_capacity(config.expectations.len());
        for (skill, value) in config.expectations {
            match Level::new(value) {
                Some(level) => {
                    expectations.insert(skill, level);
                }
                None => issues.push(TaxonomyIssue::ExpectationOutOfRange { skill, value }),
            }
        }

        for issue in &issues {
            tracing::warn!(%issue, "skipping taxonomy entry");
        }

        (
            Self {
                sections,
                positions,
                expectations,
            },
            issues,
        )
    }

    /// Parse and strictly validate a YAML taxonomy
    ///
    /// # Errors
    /// Parse failures or data issues.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TaxonomyError> {
        let config: TaxonomyConfig = serde_yaml::from_str(yaml)?;
        Self::new(config)
    }

    /// Parse and strictly validate a JSON taxonomy
    ///
    /// # Errors
    /// Parse failures or data issues.
    pub fn from_json_str(json: &str) -> Result<Self, TaxonomyError> {
        let config: TaxonomyConfig = serde_json::from_str(json)?;
        Self::new(config)
    }

    /// Load a taxonomy file; `.json` is read as JSON, anything else as YAML
    ///
    /// # Errors
    /// IO, parse or data issues.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| TaxonomyError::io_error(path, e))?;
        let taxonomy = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            _ => Self::from_yaml_str(&text)?,
        };
        tracing::info!(
            path = %path.display(),
            sections = taxonomy.sections.len(),
            skills = taxonomy.positions.len(),
            "loaded skill taxonomy"
        );
        Ok(taxonomy)
    }

    /// Sections in display order
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section by key
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// Section key of `skill`, [`OTHER_SECTION`] if unlisted
    #[must_use]
    pub fn section_of(&self, skill: &str) -> &str {
        self.positions
            .get(skill)
            .map_or(OTHER_SECTION, |pos| self.sections[pos.section].key.as_str())
    }

    /// Display title of a section key
    #[must_use]
    pub fn title_of<'a>(&'a self, key: &'a str) -> &'a str {
        if key == OTHER_SECTION {
            return OTHER_TITLE;
        }
        self.section(key).map_or(key, |s| s.title.as_str())
    }

    /// Position of `skill`, `None` if unlisted
    #[inline]
    #[must_use]
    pub fn position(&self, skill: &str) -> Option<SkillPosition> {
        self.positions.get(skill).copied()
    }

    /// Default expectation for `skill`
    #[inline]
    #[must_use]
    pub fn default_expectation(&self, skill: &str) -> Option<Level> {
        self.expectations.get(skill).copied()
    }

    /// Whether `skill` is listed in any section
    #[inline]
    #[must_use]
    pub fn contains(&self, skill: &str) -> bool {
        self.positions.contains_key(skill)
    }

    /// Number of listed skills
    #[inline]
    #[must_use]
    pub fn skill_count(&self) -> usize {
        self.positions.len()
    }

    /// Serializable form
    #[must_use]
    pub fn to_config(&self) -> TaxonomyConfig {
        TaxonomyConfig {
            sections: self.sections.clone(),
            expectations: self
                .expectations
                .iter()
                .map(|(skill, level)| (skill.clone(), level.get()))
                .collect(),
        }
    }
}

fn section_key(sections: &[Section], current: &str, index: usize) -> String {
    sections
        .get(index)
        .map_or_else(|| current.to_string(), |s| s.key.clone())
}
