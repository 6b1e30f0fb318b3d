//! The full store state the reducer transitions between.

use super::dataset::Dataset;
use super::history::{HistoryStack, JournalEntry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use thiserror::Error;

/// Why an optimistic mutation was rolled back.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RollbackReason {
    #[error("Confirmation failed: {message}")]
    Failed { message: String },

    #[error("Confirmation timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
}

impl RollbackReason {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn timed_out(timeout: Duration) -> Self {
        Self::TimedOut {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Dataset plus history, future, and optimistic bookkeeping.
///
/// This is a plain value: every field is owned, and the reducer consumes one
/// state to produce the next.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancedDatasetState {
    pub dataset: Dataset,
    /// Snapshots taken before each recorded mutation, oldest first
    pub past: HistoryStack,
    /// Snapshots consumed by undo and available to redo
    pub future: HistoryStack,
    pub is_optimistic: bool,
    pub pending_actions: BTreeSet<String>,
    pub errors: BTreeMap<String, RollbackReason>,
    /// Changes applied since the oldest pending optimistic action, oldest first
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
}

impl EnhancedDatasetState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            ..Self::default()
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn is_pending(&self, action_id: &str) -> bool {
        self.pending_actions.contains(action_id)
    }
}
