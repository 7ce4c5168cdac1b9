//! JSON file store
//!
//! Keeps the whole collection in memory and rewrites one snapshot file after
//! every mutation. The snapshot is written to a sibling temp file and then
//! renamed over the old one, so a crash mid-write never leaves a torn file.
//! A failed write rolls the in-memory state back to what is on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use skills_model::{
    FieldDefinition, FormSchema, IntakePolicy, ManagerReview, NewSurveyResponse, ResponseId,
    ResponseUpdate, SurveyResponse,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::documents::Documents;
use crate::error::{StoreError, StoreResult};
use crate::store::{ResponseStore, SchemaStore};

/// Store persisting every document to a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    documents: RwLock<Documents>,
    policy: IntakePolicy,
}

impl JsonFileStore {
    /// Open the snapshot at `path`, starting empty if it does not exist
    ///
    /// # Errors
    /// Returns `Transport` if the file cannot be read and `Serialization` if
    /// it is not a valid snapshot.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let documents = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Documents>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No snapshot yet, starting empty");
                Documents::new()
            }
            Err(e) => return Err(io_failure(&path, &e)),
        };
        info!(path = %path.display(), responses = documents.len(), "Opened response store");

        Ok(Self {
            path,
            documents: RwLock::new(documents),
            policy: IntakePolicy::default(),
        })
    }

    /// Set the intake policy
    #[must_use]
    pub fn with_policy(mut self, policy: IntakePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Snapshot file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `change` on a copy of the collection, persist it, then publish it
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Documents) -> StoreResult<T> + Send,
    ) -> StoreResult<T> {
        let mut guard = self.documents.write().await;
        let mut next = guard.clone();
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }

    async fn persist(&self, documents: &Documents) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(documents)?;
        let tmp = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_failure(parent, &e))?;
        }
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| io_failure(&tmp, &e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| io_failure(&self.path, &e))?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Wrote snapshot");
        Ok(())
    }
}

fn io_failure(path: &Path, err: &std::io::Error) -> StoreError {
    error!(path = %path.display(), error = %err, "Snapshot I/O failed");
    StoreError::transport(format!("{}: {err}", path.display()))
}

#[async_trait]
impl ResponseStore for JsonFileStore {
    async fn list_responses(&self) -> StoreResult<Vec<SurveyResponse>> {
        Ok(self.documents.read().await.list())
    }

    async fn get_response(&self, id: ResponseId) -> StoreResult<Option<SurveyResponse>> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn create_response(&self, intake: NewSurveyResponse) -> StoreResult<ResponseId> {
        let policy = &self.policy;
        let created = self
            .mutate(|docs| docs.create(intake, policy, Utc::now()))
            .await?;
        Ok(created.id)
    }

    async fn update_response(
        &self,
        id: ResponseId,
        update: ResponseUpdate,
    ) -> StoreResult<SurveyResponse> {
        let policy = &self.policy;
        self.mutate(|docs| docs.update(id, update, policy)).await
    }

    async fn delete_response(&self, id: ResponseId) -> StoreResult<()> {
        self.mutate(|docs| docs.delete(id)).await
    }

    async fn save_manager_review(
        &self,
        id: ResponseId,
        review: ManagerReview,
    ) -> StoreResult<SurveyResponse> {
        self.mutate(|docs| docs.save_review(id, review)).await
    }
}

#[async_trait]
impl SchemaStore for JsonFileStore {
    async fn get_schema(&self) -> StoreResult<Option<FormSchema>> {
        Ok(self.documents.read().await.schema().cloned())
    }

    async fn create_schema(&self, fields: Vec<FieldDefinition>) -> StoreResult<FormSchema> {
        self.mutate(|docs| docs.create_schema(fields, Utc::now()))
            .await
    }

    async fn update_schema(&self, fields: Vec<FieldDefinition>) -> StoreResult<FormSchema> {
        self.mutate(|docs| docs.update_schema(fields, Utc::now()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skills_model::{FieldType, SkillRating};
    use tempfile::TempDir;

    fn intake(name: &str) -> NewSurveyResponse {
        NewSurveyResponse {
            name: name.to_string(),
            employee_id: "E1".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            selected_skills: vec!["Go".to_string()],
            skill_ratings: vec![SkillRating {
                skill: "Go".to_string(),
                rating: 2,
            }],
            additional_skills: Some("Bash".to_string()),
        }
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("responses.json"))
            .await
            .unwrap();
        assert!(store.list_responses().await.unwrap().is_empty());
        assert_eq!(store.get_schema().await.unwrap(), None);
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("responses.json");

        let id = {
            let store = JsonFileStore::open(&path).await.unwrap();
            store
                .create_schema(vec![FieldDefinition::new("team", "Team", FieldType::Text)])
                .await
                .unwrap();
            store.create_response(intake("Bo")).await.unwrap()
        };

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let stored = reopened.get_response(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Bo");
        assert_eq!(stored.additional_skills.as_deref(), Some("Bash"));
        assert!(reopened.get_schema().await.unwrap().is_some());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn rejected_write_does_not_touch_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("responses.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        store.create_response(intake("Cy")).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        let mut bad = intake("Di");
        bad.name = "  ".to_string();
        assert!(store.create_response(bad).await.is_err());

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(store.list_responses().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unwritable_location_is_transport_error_and_rolls_back() {
        let dir = TempDir::new().unwrap();
        let parent = dir.path().join("data");
        let store = JsonFileStore::open(parent.join("responses.json"))
            .await
            .unwrap();
        // A regular file where the parent directory should be.
        std::fs::write(&parent, b"x").unwrap();

        let err = store.create_response(intake("Ed")).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(store.list_responses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("responses.json");
        std::fs::write(&path, b"{not json").unwrap();

        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
