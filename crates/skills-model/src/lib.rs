//! Skills Model
//!
//! Document types shared by every layer of the skills review service:
//! - [`SurveyResponse`]: one employee submission plus its manager review
//! - [`Rating`] / [`Level`]: tagged rating values (unrated vs 1..=5)
//! - [`ManagerReview`]: the persistable review fields
//! - [`FormSchema`]: the intake form definition
//! - [`ValidationError`]: boundary validation failures
//!
//! # Example
//!
//! ```rust
//! use skills_model::{Level, Rating};
//!
//! let own = Rating::from_stored(4);
//! let manager = Rating::from(Level::MAX);
//! assert_eq!(manager.gap_from(own), Some(1));
//! assert_eq!(Rating::Unrated.gap_from(own), None);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod rating;
pub mod response;
pub mod schema;

// Re-exports
pub use error::ValidationError;
pub use rating::{Level, LevelOutOfRange, Rating};
pub use response::{
    IntakePolicy, ManagerReview, NewSurveyResponse, RatingGap, ResponseId, ResponseUpdate,
    SkillExpectation, SkillRating, SurveyResponse,
};
pub use schema::{FieldDefinition, FieldType, FormSchema};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
