//! Fitstore: an optimistic, undo/redo-capable state store
//!
//! Fitstore keeps the members and classes of a fitness center in a single
//! normalized dataset and is built on Stillwater's "pure core, imperative
//! shell" philosophy. Every change is an [`Action`] interpreted by a pure
//! reducer, while timers, backend confirmations, and persistence live in
//! the [`Store`] shell.
//!
//! # Core Concepts
//!
//! - **Dataset**: Members and classes, shared copy-on-write between snapshots
//! - **Actions**: A closed vocabulary of mutations and history commands
//! - **History**: Bounded undo/redo stacks of dataset snapshots
//! - **Optimistic updates**: Apply now, commit on confirmation, roll back on failure
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fitstore::{ActionKind, Member, MembershipType, Store};
//!
//! let store = Store::default();
//! let member = Member::new(
//!     "Ada",
//!     "ada@gym.test",
//!     "555-0100",
//!     MembershipType::Premium,
//!     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//! );
//!
//! store.dispatch(ActionKind::AddMember(member));
//! assert_eq!(store.dataset().members().len(), 1);
//!
//! store.undo();
//! assert!(store.dataset().members().is_empty());
//!
//! store.redo();
//! assert_eq!(store.dataset().members().len(), 1);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod effects;
pub mod logging;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, StoreBuilder, StoreConfig};
pub use core::{
    reduce, Action, ActionKind, ActionMeta, Dataset, EnhancedDatasetState, FitnessClass, Member,
    MembershipType, RollbackReason,
};
pub use effects::{OptimisticError, Store};
