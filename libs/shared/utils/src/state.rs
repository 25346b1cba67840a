use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::{SharedStore, UnitOfWork};

/// Router state shared by every cell.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: SharedStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Starts a fresh unit of work for the current request.
    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::begin(self.store.clone())
    }
}
