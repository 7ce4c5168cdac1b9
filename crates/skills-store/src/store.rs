//! Storage traits
//!
//! Handlers and the review flow only see these traits; the backend is
//! chosen once at startup.

use async_trait::async_trait;
use skills_model::{
    FieldDefinition, FormSchema, ManagerReview, NewSurveyResponse, ResponseId, ResponseUpdate,
    SurveyResponse,
};

use crate::error::StoreResult;

/// Survey response persistence
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// All responses in submission order
    async fn list_responses(&self) -> StoreResult<Vec<SurveyResponse>>;

    /// One response, `None` if the id is unknown
    async fn get_response(&self, id: ResponseId) -> StoreResult<Option<SurveyResponse>>;

    /// Validate and store a new submission
    async fn create_response(&self, intake: NewSurveyResponse) -> StoreResult<ResponseId>;

    /// Apply a partial intake update
    async fn update_response(
        &self,
        id: ResponseId,
        update: ResponseUpdate,
    ) -> StoreResult<SurveyResponse>;

    /// Remove a response
    async fn delete_response(&self, id: ResponseId) -> StoreResult<()>;

    /// Validate and replace the review fields of a response
    ///
    /// Either the whole review is written or nothing is.
    async fn save_manager_review(
        &self,
        id: ResponseId,
        review: ManagerReview,
    ) -> StoreResult<SurveyResponse>;
}

/// Intake form schema persistence
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Latest schema, `None` if none was ever created
    async fn get_schema(&self) -> StoreResult<Option<FormSchema>>;

    /// Store a schema, replacing any earlier version
    async fn create_schema(&self, fields: Vec<FieldDefinition>) -> StoreResult<FormSchema>;

    /// Replace the fields of the existing schema
    async fn update_schema(&self, fields: Vec<FieldDefinition>) -> StoreResult<FormSchema>;
}
