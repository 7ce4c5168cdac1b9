//! Taxonomy errors

use std::path::PathBuf;

/// A data problem found while building a taxonomy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyIssue {
    /// Skill listed in more than one section (or twice in one)
    #[error("skill '{skill}' is listed in both '{first}' and '{second}'")]
    DuplicateMembership {
        /// Skill listed twice
        skill: String,
        /// Section holding the kept membership
        first: String,
        /// Section holding the dropped membership
        second: String,
    },

    /// Section key used twice
    #[error("section '{0}' is defined more than once")]
    DuplicateSection(String),

    /// Section key blank
    #[error("section with blank key")]
    BlankSectionKey,

    /// Section uses the key reserved for unclassified skills
    #[error("section key '{0}' is reserved")]
    ReservedSectionKey(String),

    /// Default expectation outside 1..=5
    #[error("expectation {value} for '{skill}' is outside 1..=5")]
    ExpectationOutOfRange {
        /// Skill carrying the bad default
        skill: String,
        /// Value as written
        value: u8,
    },
}

/// Taxonomy construction or loading failure
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    /// Data problems found in strict mode
    #[error("invalid taxonomy ({} issue(s)): {}", .0.len(), first_issue(.0))]
    Invalid(Vec<TaxonomyIssue>),

    /// IO error reading a taxonomy file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// YAML parse failure
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

fn first_issue(issues: &[TaxonomyIssue]) -> String {
    issues.first().map(ToString::to_string).unwrap_or_default()
}

impl TaxonomyError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Data issues, if this is a validation failure
    #[must_use]
    pub fn issues(&self) -> &[TaxonomyIssue] {
        match self {
            Self::Invalid(issues) => issues,
            _ => &[],
        }
    }
}
