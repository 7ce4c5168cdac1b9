//! Review lifecycle
//!
//! A [`ReviewSession`] owns the sheet a manager is editing and tracks which
//! phase it is in:
//!
//! ```text
//!   Editing --begin_save--> Saving --finish_save(Ok)--> Completed
//!      ^                      |                            |
//!      +---finish_save(Err)---+                            |
//!      +-----------------------------edit------------------+
//! ```
//!
//! Edits are accepted only while editing. A failed save returns to editing
//! with the in-memory edits intact and the failure reason recorded. A save
//! that stores no manager rating also lands back in editing, since the
//! stored record does not count as reviewed.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use skills_model::{Level, ManagerReview, SurveyResponse};
use skills_store::{FailureReason, ResponseStore, StoreError};
use skills_taxonomy::Taxonomy;
use tracing::{debug, warn};

use crate::error::{ReviewError, ReviewResult};
use crate::sheet::{reconcile, ReviewSheet};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPhase {
    /// Manager may change ratings
    Editing,
    /// Review handed to the store, awaiting the outcome
    Saving,
    /// Review persisted; read-only summary
    Completed,
}

impl fmt::Display for ReviewPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Editing => "editing",
            Self::Saving => "saving",
            Self::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Why the last save failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveFailure {
    pub reason: FailureReason,
    pub message: String,
}

impl From<&StoreError> for SaveFailure {
    fn from(err: &StoreError) -> Self {
        Self {
            reason: err.reason(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SaveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason.describe(), self.message)
    }
}

/// One manager's review of one response
#[derive(Debug, Clone)]
pub struct ReviewSession {
    taxonomy: Arc<Taxonomy>,
    persisted: SurveyResponse,
    sheet: ReviewSheet,
    phase: ReviewPhase,
    last_failure: Option<SaveFailure>,
}

impl ReviewSession {
    /// Open `response` for review
    ///
    /// A response with a completed review opens read-only.
    #[must_use]
    pub fn open(response: SurveyResponse, taxonomy: Arc<Taxonomy>) -> Self {
        let sheet = reconcile(&response, &taxonomy);
        let phase = phase_of(&response);
        debug!(id = %response.id, %phase, "Opened review session");

        Self {
            taxonomy,
            persisted: response,
            sheet,
            phase,
            last_failure: None,
        }
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> ReviewPhase {
        self.phase
    }

    /// Sheet being edited, or the persisted summary
    #[inline]
    #[must_use]
    pub fn sheet(&self) -> &ReviewSheet {
        &self.sheet
    }

    /// Response as last loaded or saved
    #[inline]
    #[must_use]
    pub fn persisted(&self) -> &SurveyResponse {
        &self.persisted
    }

    /// Failure of the most recent save, cleared by a successful one
    #[inline]
    #[must_use]
    pub fn last_failure(&self) -> Option<&SaveFailure> {
        self.last_failure.as_ref()
    }

    /// Set a manager rating
    ///
    /// # Errors
    /// Returns [`ReviewError::ReadOnly`] outside the editing phase, or
    /// [`ReviewError::UnknownSkill`] if no record matches.
    pub fn apply_manager_rating(&mut self, skill: &str, section: &str, level: Level) -> ReviewResult<()> {
        self.ensure_editing()?;
        self.sheet.apply_manager_rating(skill, section, level)?;
        Ok(())
    }

    /// Override an expectation
    ///
    /// # Errors
    /// Same as [`Self::apply_manager_rating`].
    pub fn set_expectation(&mut self, skill: &str, section: &str, level: Level) -> ReviewResult<()> {
        self.ensure_editing()?;
        self.sheet.set_expectation(skill, section, level)?;
        Ok(())
    }

    /// Remove a manager rating
    ///
    /// # Errors
    /// Same as [`Self::apply_manager_rating`].
    pub fn clear_manager_rating(&mut self, skill: &str, section: &str) -> ReviewResult<()> {
        self.ensure_editing()?;
        self.sheet.clear_manager_rating(skill, section)?;
        Ok(())
    }

    /// Replace the overall review text
    ///
    /// # Errors
    /// Returns [`ReviewError::ReadOnly`] outside the editing phase.
    pub fn set_overall(&mut self, overall: Option<String>) -> ReviewResult<()> {
        self.ensure_editing()?;
        self.sheet.set_overall(overall);
        Ok(())
    }

    /// Enter the saving phase and produce the review to persist
    ///
    /// # Errors
    /// Returns [`ReviewError::SaveInFlight`] while a save is pending and
    /// [`ReviewError::NotEditing`] once completed.
    pub fn begin_save(&mut self) -> ReviewResult<ManagerReview> {
        match self.phase {
            ReviewPhase::Editing => {}
            ReviewPhase::Saving => return Err(ReviewError::SaveInFlight),
            ReviewPhase::Completed => return Err(ReviewError::NotEditing(self.phase)),
        }
        self.phase = ReviewPhase::Saving;
        debug!(id = %self.persisted.id, "Saving review");
        Ok(self.sheet.to_persistable())
    }

    /// Record the store's answer to the pending save
    ///
    /// On success the session re-seeds from the stored record and takes the
    /// phase that record implies: a save without manager ratings stays in
    /// editing.
    /// On failure it returns to editing, keeps the edits and hands the store
    /// error back.
    ///
    /// # Errors
    /// Returns [`ReviewError::NotSaving`] with no save pending, or
    /// [`ReviewError::Store`] carrying a failed outcome.
    pub fn finish_save(&mut self, outcome: Result<SurveyResponse, StoreError>) -> ReviewResult<()> {
        if self.phase != ReviewPhase::Saving {
            return Err(ReviewError::NotSaving(self.phase));
        }

        match outcome {
            Ok(record) => {
                self.sheet = reconcile(&record, &self.taxonomy);
                self.phase = phase_of(&record);
                self.persisted = record;
                self.last_failure = None;
                debug!(id = %self.persisted.id, phase = %self.phase, "Review saved");
                Ok(())
            }
            Err(err) => {
                let failure = SaveFailure::from(&err);
                warn!(id = %self.persisted.id, reason = ?failure.reason, error = %err, "Review save failed");
                self.phase = ReviewPhase::Editing;
                self.last_failure = Some(failure);
                Err(ReviewError::Store(err))
            }
        }
    }

    /// Reopen a completed review for editing, starting from stored values
    ///
    /// # Errors
    /// Returns [`ReviewError::SaveInFlight`] while a save is pending.
    pub fn edit(&mut self) -> ReviewResult<()> {
        match self.phase {
            ReviewPhase::Editing => Ok(()),
            ReviewPhase::Saving => Err(ReviewError::SaveInFlight),
            ReviewPhase::Completed => {
                self.sheet = reconcile(&self.persisted, &self.taxonomy);
                self.phase = ReviewPhase::Editing;
                debug!(id = %self.persisted.id, "Reopened review for editing");
                Ok(())
            }
        }
    }

    /// Persist the current edits through `store`
    ///
    /// # Errors
    /// Any error from [`Self::begin_save`] or [`Self::finish_save`].
    pub async fn save(&mut self, store: &dyn ResponseStore) -> ReviewResult<&SurveyResponse> {
        let review = self.begin_save()?;
        let outcome = store.save_manager_review(self.persisted.id, review).await;
        self.finish_save(outcome)?;
        Ok(&self.persisted)
    }

    fn ensure_editing(&self) -> ReviewResult<()> {
        if self.phase == ReviewPhase::Editing {
            Ok(())
        } else {
            Err(ReviewError::ReadOnly(self.phase))
        }
    }
}

fn phase_of(record: &SurveyResponse) -> ReviewPhase {
    if record.review_completed() {
        ReviewPhase::Completed
    } else {
        ReviewPhase::Editing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use skills_model::{NewSurveyResponse, ResponseId, ResponseUpdate};
    use skills_store::{MemoryStore, StoreResult};
    use skills_test_utils::{create_response, create_review, create_test_taxonomy};

    fn level(value: u8) -> Level {
        Level::new(value).unwrap()
    }

    fn session(ratings: &[(&str, u8)]) -> ReviewSession {
        ReviewSession::open(create_response(ratings), Arc::new(create_test_taxonomy()))
    }

    #[test]
    fn unreviewed_opens_editing_completed_opens_read_only() {
        assert_eq!(session(&[("Python", 4)]).phase(), ReviewPhase::Editing);

        let mut response = create_response(&[("Python", 4)]);
        response.apply_review(create_review(&response, &[("Python", 5)]));
        let mut done = ReviewSession::open(response, Arc::new(create_test_taxonomy()));
        assert_eq!(done.phase(), ReviewPhase::Completed);
        assert_eq!(
            done.apply_manager_rating("Python", "programming", level(3)),
            Err(ReviewError::ReadOnly(ReviewPhase::Completed))
        );
    }

    #[test]
    fn second_begin_save_is_refused() {
        let mut s = session(&[("Python", 4)]);
        s.begin_save().unwrap();
        assert_eq!(s.begin_save(), Err(ReviewError::SaveInFlight));
        assert_eq!(
            s.apply_manager_rating("Python", "programming", level(5)),
            Err(ReviewError::ReadOnly(ReviewPhase::Saving))
        );
    }

    #[test]
    fn failed_save_keeps_edits() {
        let mut s = session(&[("Python", 4)]);
        s.apply_manager_rating("Python", "programming", level(5)).unwrap();
        s.begin_save().unwrap();

        let err = s
            .finish_save(Err(StoreError::transport("connection refused")))
            .unwrap_err();
        assert_eq!(err.reason(), Some(FailureReason::Connectivity));
        assert_eq!(s.phase(), ReviewPhase::Editing);
        assert_eq!(s.last_failure().unwrap().reason, FailureReason::Connectivity);
        assert_eq!(
            s.sheet().record("Python").unwrap().manager_rating,
            level(5).into()
        );
    }

    #[test]
    fn finish_without_begin_is_refused() {
        let mut s = session(&[("Python", 4)]);
        let record = s.persisted().clone();
        assert_eq!(
            s.finish_save(Ok(record)),
            Err(ReviewError::NotSaving(ReviewPhase::Editing))
        );
    }

    #[tokio::test]
    async fn save_through_store_completes() {
        let response = create_response(&[("Python", 4), ("SQL", 2)]);
        let store = MemoryStore::new().with_responses([response.clone()]);
        let mut s = ReviewSession::open(response, Arc::new(create_test_taxonomy()));

        s.apply_manager_rating("Python", "programming", level(5)).unwrap();
        s.set_overall(Some("Great".to_string())).unwrap();
        let saved = s.save(&store).await.unwrap().clone();

        assert_eq!(s.phase(), ReviewPhase::Completed);
        assert!(s.last_failure().is_none());
        assert_eq!(saved.manager_ratings.len(), 1);
        assert_eq!(saved.overall_manager_review.as_deref(), Some("Great"));
    }

    #[tokio::test]
    async fn edit_then_resave_overwrites() {
        let response = create_response(&[("Python", 4)]);
        let store = MemoryStore::new().with_responses([response.clone()]);
        let mut s = ReviewSession::open(response, Arc::new(create_test_taxonomy()));
        s.apply_manager_rating("Python", "programming", level(5)).unwrap();
        s.save(&store).await.unwrap();

        s.edit().unwrap();
        assert_eq!(s.phase(), ReviewPhase::Editing);
        s.apply_manager_rating("Python", "programming", level(3)).unwrap();
        let saved = s.save(&store).await.unwrap();
        assert_eq!(saved.manager_rating("Python"), level(3).into());
    }

    #[tokio::test]
    async fn save_without_manager_ratings_stays_editing() {
        let response = create_response(&[("Python", 4)]);
        let store = MemoryStore::new().with_responses([response.clone()]);
        let taxonomy = Arc::new(create_test_taxonomy());
        let mut s = ReviewSession::open(response, taxonomy.clone());

        s.set_expectation("Python", "programming", level(5)).unwrap();
        s.set_overall(Some("Check back next quarter".to_string())).unwrap();
        let saved = s.save(&store).await.unwrap().clone();

        assert_eq!(s.phase(), ReviewPhase::Editing);
        assert!(saved.manager_ratings.is_empty());
        assert_eq!(saved.expectation("Python"), Some(level(5).into()));

        let reopened = ReviewSession::open(saved, taxonomy);
        assert_eq!(reopened.phase(), s.phase());
        s.apply_manager_rating("Python", "programming", level(4)).unwrap();
    }

    struct UnreachableStore;

    #[async_trait]
    impl ResponseStore for UnreachableStore {
        async fn list_responses(&self) -> StoreResult<Vec<SurveyResponse>> {
            Err(StoreError::transport("offline"))
        }
        async fn get_response(&self, _: ResponseId) -> StoreResult<Option<SurveyResponse>> {
            Err(StoreError::transport("offline"))
        }
        async fn create_response(&self, _: NewSurveyResponse) -> StoreResult<ResponseId> {
            Err(StoreError::transport("offline"))
        }
        async fn update_response(&self, _: ResponseId, _: ResponseUpdate) -> StoreResult<SurveyResponse> {
            Err(StoreError::transport("offline"))
        }
        async fn delete_response(&self, _: ResponseId) -> StoreResult<()> {
            Err(StoreError::transport("offline"))
        }
        async fn save_manager_review(&self, _: ResponseId, _: ManagerReview) -> StoreResult<SurveyResponse> {
            Err(StoreError::transport("offline"))
        }
    }

    #[tokio::test]
    async fn unreachable_store_returns_to_editing() {
        let mut s = session(&[("Python", 4)]);
        s.apply_manager_rating("Python", "programming", level(2)).unwrap();

        let err = s.save(&UnreachableStore).await.unwrap_err();
        assert!(matches!(err, ReviewError::Store(StoreError::Transport(_))));
        assert_eq!(s.phase(), ReviewPhase::Editing);
        assert!(s.last_failure().unwrap().to_string().contains("could not be reached"));
    }
}
