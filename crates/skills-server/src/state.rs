//! Shared handler state

use std::sync::Arc;

use skills_store::{JsonFileStore, MemoryStore, ResponseStore, SchemaStore, StoreError};
use skills_taxonomy::{Taxonomy, TaxonomyError};
use tracing::{info, warn};

use crate::config::ServerConfig;

/// Start-up failure while building state
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to load taxonomy: {0}")]
    Taxonomy(#[from] TaxonomyError),
}

/// Stores and reference data available to every handler
#[derive(Clone)]
pub struct AppState {
    pub responses: Arc<dyn ResponseStore>,
    pub schemas: Arc<dyn SchemaStore>,
    pub taxonomy: Arc<Taxonomy>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sections", &self.taxonomy.sections().len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State backed by one store serving both responses and schemas
    pub fn new<S>(store: Arc<S>, taxonomy: Taxonomy) -> Self
    where
        S: ResponseStore + SchemaStore + 'static,
    {
        Self {
            responses: store.clone(),
            schemas: store,
            taxonomy: Arc::new(taxonomy),
        }
    }

    /// Build state from configuration
    ///
    /// # Errors
    /// Returns [`StateError`] if the snapshot or taxonomy file cannot be
    /// loaded.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, StateError> {
        let taxonomy = match &config.taxonomy_file {
            Some(path) => Taxonomy::load(path)?,
            None => Taxonomy::builtin(),
        };
        let policy = config.intake_policy();

        let state = match &config.data_file {
            Some(path) => {
                let store = JsonFileStore::open(path).await?.with_policy(policy);
                Self::new(Arc::new(store), taxonomy)
            }
            None => {
                warn!("No data_file configured, responses are kept in memory only");
                Self::new(Arc::new(MemoryStore::new().with_policy(policy)), taxonomy)
            }
        };
        info!(
            skills = state.taxonomy.skill_count(),
            sections = state.taxonomy.sections().len(),
            "Application state ready"
        );
        Ok(state)
    }
}
