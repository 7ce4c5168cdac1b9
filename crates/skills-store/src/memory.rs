//! In-memory store
//!
//! Backs tests and single-process deployments that do not need the data
//! to outlive the process.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use skills_model::{
    FieldDefinition, FormSchema, IntakePolicy, ManagerReview, NewSurveyResponse, ResponseId,
    ResponseUpdate, SurveyResponse,
};

use crate::documents::Documents;
use crate::error::StoreResult;
use crate::store::{ResponseStore, SchemaStore};

/// Store holding every document in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Documents>,
    policy: IntakePolicy,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the intake policy
    #[must_use]
    pub fn with_policy(mut self, policy: IntakePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Seed with existing responses, bypassing intake validation
    #[must_use]
    pub fn with_responses(self, responses: impl IntoIterator<Item = SurveyResponse>) -> Self {
        *self.documents.write() = responses.into_iter().collect();
        self
    }

    /// Number of stored responses
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Check if no responses are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Intake policy in force
    #[must_use]
    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    async fn list_responses(&self) -> StoreResult<Vec<SurveyResponse>> {
        Ok(self.documents.read().list())
    }

    async fn get_response(&self, id: ResponseId) -> StoreResult<Option<SurveyResponse>> {
        Ok(self.documents.read().get(id).cloned())
    }

    async fn create_response(&self, intake: NewSurveyResponse) -> StoreResult<ResponseId> {
        let created = self
            .documents
            .write()
            .create(intake, &self.policy, Utc::now())?;
        Ok(created.id)
    }

    async fn update_response(
        &self,
        id: ResponseId,
        update: ResponseUpdate,
    ) -> StoreResult<SurveyResponse> {
        self.documents.write().update(id, update, &self.policy)
    }

    async fn delete_response(&self, id: ResponseId) -> StoreResult<()> {
        self.documents.write().delete(id)
    }

    async fn save_manager_review(
        &self,
        id: ResponseId,
        review: ManagerReview,
    ) -> StoreResult<SurveyResponse> {
        self.documents.write().save_review(id, review)
    }
}

#[async_trait]
impl SchemaStore for MemoryStore {
    async fn get_schema(&self) -> StoreResult<Option<FormSchema>> {
        Ok(self.documents.read().schema().cloned())
    }

    async fn create_schema(&self, fields: Vec<FieldDefinition>) -> StoreResult<FormSchema> {
        self.documents.write().create_schema(fields, Utc::now())
    }

    async fn update_schema(&self, fields: Vec<FieldDefinition>) -> StoreResult<FormSchema> {
        self.documents.write().update_schema(fields, Utc::now())
    }
}
