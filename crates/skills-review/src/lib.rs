//! Skills Review
//!
//! The manager review of a self-assessment:
//! - [`reconcile`]: merge a stored response with the taxonomy into per-skill records
//! - [`ReviewSheet`]: records grouped by section, with manager edits
//! - [`to_persistable`]: records back into the stored review fields
//! - [`ReviewSession`]: editing / saving / completed lifecycle
//! - [`analytics`]: aggregates across all responses
//!
//! # Example
//!
//! ```rust
//! use skills_model::{Level, NewSurveyResponse, ResponseId, SkillRating, SurveyResponse};
//! use skills_review::{reconcile, GapStatus};
//! use skills_taxonomy::Taxonomy;
//!
//! let intake = NewSurveyResponse {
//!     name: "Ana".into(),
//!     employee_id: "E1".into(),
//!     email: "ana@example.com".into(),
//!     selected_skills: vec!["Python".into()],
//!     skill_ratings: vec![SkillRating { skill: "Python".into(), rating: 4 }],
//!     additional_skills: None,
//! };
//! let response = SurveyResponse::from_intake(ResponseId::new(), intake, chrono::Utc::now());
//!
//! let mut sheet = reconcile(&response, &Taxonomy::builtin());
//! let record = sheet
//!     .apply_manager_rating("Python", "programming", Level::MAX)
//!     .unwrap();
//! assert_eq!(record.gap(), Some(1));
//! assert_eq!(record.status(), GapStatus::Exceeds);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod analytics;
pub mod error;
pub mod record;
pub mod session;
pub mod sheet;

// Re-exports
pub use analytics::{analyze, AnalyticsReport, SectionStats, SkillStats};
pub use error::{ReviewError, ReviewResult};
pub use record::{GapStatus, SkillReview};
pub use session::{ReviewPhase, ReviewSession, SaveFailure};
pub use sheet::{reconcile, to_persistable, ReviewSheet, SectionView};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
