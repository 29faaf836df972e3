//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{AdminBackendClient, BackendError};
use crate::config::AdminConfig;
use crate::services::SettingsStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: AdminBackendClient,
    settings: SettingsStore,
}

impl AppState {
    /// Create the state from configuration and an opened settings store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: AdminConfig, settings: SettingsStore) -> Result<Self, BackendError> {
        let backend = AdminBackendClient::new(&config.backend)?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                settings,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the store backend client.
    #[must_use]
    pub fn backend(&self) -> &AdminBackendClient {
        &self.inner.backend
    }

    /// Get a reference to the settings store.
    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }
}
