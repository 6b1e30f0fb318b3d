//! Build errors for the store builder.

use crate::checkpoint::CheckpointError;
use thiserror::Error;

/// Errors that can occur when building a store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Optimistic timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Storage key is empty. Call .config(..) with a non-empty storage_key")]
    EmptyStorageKey,

    #[error("Hydration requested without a persistence provider. Call .persistence(provider)")]
    MissingPersistence,

    #[error("Failed to hydrate store: {0}")]
    Hydration(#[from] CheckpointError),
}
