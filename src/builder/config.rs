//! Store configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`StoreConfig::optimistic_timeout_ms`].
pub const TIMEOUT_ENV: &str = "FITSTORE_OPTIMISTIC_TIMEOUT_MS";

/// Environment variable overriding [`StoreConfig::storage_key`].
pub const STORAGE_KEY_ENV: &str = "FITSTORE_STORAGE_KEY";

const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_STORAGE_KEY: &str = "fitstore.dataset";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration document: {0}")]
    Parse(String),

    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: String, value: String },
}

/// Tunables for a [`Store`](crate::effects::Store).
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// How long an optimistic action may stay pending before it is rolled back
    pub optimistic_timeout_ms: u64,

    /// Key under which the dataset is stored in the persistence provider
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            optimistic_timeout_ms: DEFAULT_TIMEOUT_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn optimistic_timeout(&self) -> Duration {
        Duration::from_millis(self.optimistic_timeout_ms)
    }

    /// Parse a JSON document, filling absent fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults overridden by `FITSTORE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(TIMEOUT_ENV) {
            self.optimistic_timeout_ms =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnv {
                        var: TIMEOUT_ENV.to_string(),
                        value: value.clone(),
                    })?;
        }
        if let Some(value) = lookup(STORAGE_KEY_ENV) {
            self.storage_key = value;
        }
        Ok(self)
    }
}
