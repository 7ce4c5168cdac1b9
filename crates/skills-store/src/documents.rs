//! In-process document collection shared by the store backends
//!
//! Every mutation validates first and only then writes, so a rejected call
//! leaves the collection untouched.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use skills_model::{
    FieldDefinition, FormSchema, IntakePolicy, ManagerReview, NewSurveyResponse, ResponseId,
    ResponseUpdate, SurveyResponse,
};
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::validation::validate_manager_review;

/// All stored responses plus the latest form schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Documents {
    #[serde(with = "response_list", default)]
    responses: IndexMap<ResponseId, SurveyResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema: Option<FormSchema>,
}

impl Documents {
    /// Empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored responses
    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Check if no responses are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Responses in insertion order
    #[must_use]
    pub fn list(&self) -> Vec<SurveyResponse> {
        self.responses.values().cloned().collect()
    }

    /// One response by id
    #[must_use]
    pub fn get(&self, id: ResponseId) -> Option<&SurveyResponse> {
        self.responses.get(&id)
    }

    /// Latest form schema
    #[must_use]
    pub fn schema(&self) -> Option<&FormSchema> {
        self.schema.as_ref()
    }

    /// Store a new submission
    ///
    /// # Errors
    /// Returns a validation error if the intake breaks a rule in `policy`.
    pub fn create(
        &mut self,
        intake: NewSurveyResponse,
        policy: &IntakePolicy,
        now: DateTime<Utc>,
    ) -> StoreResult<SurveyResponse> {
        let intake = intake.normalized();
        intake.validate(policy)?;

        let id = ResponseId::new();
        let response = SurveyResponse::from_intake(id, intake, now);
        self.responses.insert(id, response.clone());
        info!(%id, "Stored survey response");
        Ok(response)
    }

    /// Apply a partial intake update
    ///
    /// Stored gaps are re-derived from the new self ratings, and manager
    /// ratings on skills no longer under review are dropped.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id, or a validation error if the
    /// updated intake fields break a rule in `policy`.
    pub fn update(
        &mut self,
        id: ResponseId,
        update: ResponseUpdate,
        policy: &IntakePolicy,
    ) -> StoreResult<SurveyResponse> {
        let current = self.responses.get(&id).ok_or(StoreError::NotFound(id))?;

        let mut next = current.clone();
        next.apply_update(update);
        let intake = next.intake().normalized();
        intake.validate(policy)?;
        next.name = intake.name;
        next.employee_id = intake.employee_id;
        next.email = intake.email;
        next.selected_skills = intake.selected_skills;
        next.skill_ratings = intake.skill_ratings;

        for skill in next.refresh_gaps() {
            warn!(%id, %skill, "Dropped manager rating for a skill no longer under review");
        }

        self.responses.insert(id, next.clone());
        info!(%id, "Updated survey response");
        Ok(next)
    }

    /// Remove a response
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id.
    pub fn delete(&mut self, id: ResponseId) -> StoreResult<()> {
        self.responses
            .shift_remove(&id)
            .ok_or(StoreError::NotFound(id))?;
        info!(%id, "Deleted survey response");
        Ok(())
    }

    /// Replace the review fields of a response
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id, `Conflict` for a rating on a
    /// skill the employee never chose, or a validation error.
    pub fn save_review(&mut self, id: ResponseId, review: ManagerReview) -> StoreResult<SurveyResponse> {
        let response = self.responses.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        validate_manager_review(response, &review)?;
        response.apply_review(review);
        info!(%id, ratings = response.manager_ratings.len(), "Stored manager review");
        Ok(response.clone())
    }

    /// Write the first schema, or a new version over an existing one
    ///
    /// # Errors
    /// Returns a validation error for a malformed field list.
    pub fn create_schema(
        &mut self,
        fields: Vec<FieldDefinition>,
        now: DateTime<Utc>,
    ) -> StoreResult<FormSchema> {
        FormSchema::validate_fields(&fields)?;
        let version = FormSchema::next_version(self.schema.as_ref().map(|s| s.version), now);
        let schema = FormSchema { fields, version };
        self.schema = Some(schema.clone());
        info!(version, "Stored form schema");
        Ok(schema)
    }

    /// Replace the fields of the existing schema
    ///
    /// # Errors
    /// Returns `SchemaNotFound` when no schema exists yet, or a validation
    /// error for a malformed field list.
    pub fn update_schema(
        &mut self,
        fields: Vec<FieldDefinition>,
        now: DateTime<Utc>,
    ) -> StoreResult<FormSchema> {
        if self.schema.is_none() {
            return Err(StoreError::SchemaNotFound);
        }
        self.create_schema(fields, now)
    }
}

impl FromIterator<SurveyResponse> for Documents {
    fn from_iter<I: IntoIterator<Item = SurveyResponse>>(iter: I) -> Self {
        Self {
            responses: iter.into_iter().map(|r| (r.id, r)).collect(),
            schema: None,
        }
    }
}

// Responses are written as a plain array; the map key is the embedded id.
mod response_list {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use skills_model::{ResponseId, SurveyResponse};

    pub(super) fn serialize<S: Serializer>(
        responses: &IndexMap<ResponseId, SurveyResponse>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(responses.values())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<ResponseId, SurveyResponse>, D::Error> {
        let list = Vec::<SurveyResponse>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|r| (r.id, r)).collect())
    }
}
