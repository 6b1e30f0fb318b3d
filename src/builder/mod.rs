//! Builder API for ergonomic store construction.
//!
//! Configuration comes from defaults, a JSON document, or `FITSTORE_*`
//! environment variables, and is validated once when the store is built.

pub mod config;
pub mod error;
pub mod store;

pub use config::{ConfigError, StoreConfig, STORAGE_KEY_ENV, TIMEOUT_ENV};
pub use error::BuildError;
pub use store::StoreBuilder;
