//! Skills Taxonomy
//!
//! Read-only reference data: which section a skill belongs to, the fixed
//! order of skills within each section, and the default expectation level.
//!
//! The taxonomy is a plain value passed to whatever needs it, so tests and
//! deployments can swap tables without touching global state.
//!
//! # Example
//!
//! ```rust
//! use skills_taxonomy::{Taxonomy, OTHER_SECTION};
//!
//! let taxonomy = Taxonomy::builtin();
//! assert_eq!(taxonomy.section_of("Python"), "programming");
//! assert_eq!(taxonomy.section_of("Rust"), OTHER_SECTION);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod builtin;
pub mod error;
mod taxonomy;

pub use builtin::builtin_config;
pub use error::{TaxonomyError, TaxonomyIssue};
pub use taxonomy::{
    Section, SkillPosition, Taxonomy, TaxonomyConfig, OTHER_SECTION, OTHER_TITLE,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
