//! Key-value persistence providers the store hydrates from and flushes to.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Error reported by a persistence provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("read of '{key}' failed: {message}")]
    ReadFailed { key: String, message: String },

    #[error("write of '{key}' failed: {message}")]
    WriteFailed { key: String, message: String },
}

/// External string key-value storage.
///
/// The store only needs whole-value reads and writes; durability and
/// format beyond the checkpoint document are up to the implementation.
pub trait Persistence: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Process-local provider backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider pre-seeded with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let provider = Self::new();
        provider
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        provider
    }
}

impl Persistence for InMemoryPersistence {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
