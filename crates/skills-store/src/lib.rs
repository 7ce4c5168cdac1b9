//! Skills Store
//!
//! Data access for survey responses and the intake form schema:
//! - [`ResponseStore`] / [`SchemaStore`]: async storage traits
//! - [`MemoryStore`]: process-local backend
//! - [`JsonFileStore`]: single-file JSON snapshot backend
//! - [`validate_manager_review`]: strict checks applied before a review is written
//!
//! # Example
//!
//! ```rust
//! use skills_model::NewSurveyResponse;
//! use skills_store::{MemoryStore, ResponseStore};
//!
//! # tokio_test_block_on(async {
//! let store = MemoryStore::new();
//! let id = store
//!     .create_response(NewSurveyResponse {
//!         name: "Ana".into(),
//!         employee_id: "E1".into(),
//!         email: "ana@example.com".into(),
//!         ..NewSurveyResponse::default()
//!     })
//!     .await
//!     .unwrap();
//! assert!(store.get_response(id).await.unwrap().is_some());
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod documents;
pub mod error;
pub mod file;
pub mod memory;
pub mod store;
pub mod validation;

// Re-exports
pub use documents::Documents;
pub use error::{FailureReason, StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{ResponseStore, SchemaStore};
pub use validation::validate_manager_review;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
