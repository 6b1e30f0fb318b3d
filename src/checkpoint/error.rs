//! Checkpoint error types.

use super::persistence::PersistenceError;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The persistence provider failed to load or save
    #[error("Storage failed: {0}")]
    Storage(#[from] PersistenceError),

    /// The store was built without a persistence provider
    #[error("No persistence provider configured")]
    NoProvider,
}
