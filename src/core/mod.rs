//! Core store types and logic.
//!
//! This module contains the pure functional core of the store:
//! - The normalized dataset of members and classes
//! - The closed action vocabulary
//! - Bounded undo/redo history
//! - The reducer that transitions between states
//!
//! All logic in this module is pure (no side effects), following
//! the "pure core, imperative shell" philosophy.

mod action;
mod dataset;
mod history;
mod reducer;
mod state;

pub use action::{Action, ActionKind, ActionMeta, ACTION_TAGS};
pub use dataset::{
    next_id, ClassId, Dataset, DatasetError, FitnessClass, Member, MemberId, MembershipType,
};
pub use history::{HistoryEntry, HistoryStack, JournalEntry, HISTORY_LIMIT};
pub use reducer::reduce;
pub use state::{EnhancedDatasetState, RollbackReason};
