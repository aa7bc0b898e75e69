use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::Advisor;
use crate::store::CollectionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<CollectionStore>,
    pub advisor: Arc<Advisor>,
}

impl AppState {
    /// Build state from configuration, opening the configured store.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let store = CollectionStore::open(&config);
        let advisor = Advisor::from_config(&config)?;
        Ok(Self::new(config, store, advisor))
    }

    pub fn new(config: Config, store: CollectionStore, advisor: Advisor) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            advisor: Arc::new(advisor),
        }
    }
}
