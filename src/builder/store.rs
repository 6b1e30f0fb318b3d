//! Builder for constructing stores.

use crate::builder::config::StoreConfig;
use crate::builder::error::BuildError;
use crate::checkpoint::Persistence;
use crate::core::Dataset;
use crate::effects::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builder for constructing a [`Store`] with a fluent API.
pub struct StoreBuilder {
    initial: Dataset,
    config: StoreConfig,
    persistence: Option<Arc<dyn Persistence>>,
    hydrate: bool,
}

impl StoreBuilder {
    /// Create a new builder over an empty dataset.
    pub fn new() -> Self {
        Self {
            initial: Dataset::default(),
            config: StoreConfig::default(),
            persistence: None,
            hydrate: false,
        }
    }

    /// Set the initial dataset.
    pub fn initial(mut self, dataset: Dataset) -> Self {
        self.initial = dataset;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the optimistic confirmation timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.optimistic_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Attach a persistence provider for flush and hydration.
    pub fn persistence(mut self, provider: Arc<dyn Persistence>) -> Self {
        self.persistence = Some(provider);
        self
    }

    /// Load the stored dataset, if any, while building.
    pub fn hydrate_on_build(mut self, hydrate: bool) -> Self {
        self.hydrate = hydrate;
        self
    }

    /// Build the store.
    /// Returns an error if the configuration is unusable or hydration fails.
    pub fn build(self) -> Result<Store, BuildError> {
        if self.config.optimistic_timeout_ms == 0 {
            return Err(BuildError::ZeroTimeout);
        }

        if self.config.storage_key.trim().is_empty() {
            return Err(BuildError::EmptyStorageKey);
        }

        if self.hydrate && self.persistence.is_none() {
            return Err(BuildError::MissingPersistence);
        }

        let store = Store::from_parts(self.initial, self.config, self.persistence);

        if self.hydrate {
            let hydrated = store.hydrate()?;
            info!(hydrated, "store hydrated on build");
        }

        Ok(store)
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
