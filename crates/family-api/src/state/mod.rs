//! Application state
//!
//! Holds the shared state for the Axum application: the roster sync
//! state holder and configuration.

use std::sync::Arc;

use family_common::AppConfig;
use family_sync::FamilyDirectorySync;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    sync: Arc<FamilyDirectorySync>,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(sync: Arc<FamilyDirectorySync>, config: AppConfig) -> Self {
        Self {
            sync,
            config: Arc::new(config),
        }
    }

    /// Get the roster sync state holder
    pub fn sync(&self) -> &Arc<FamilyDirectorySync> {
        &self.sync
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sync", &self.sync)
            .field("config", &"AppConfig")
            .finish()
    }
}
