//! Bounded snapshot stacks backing linear undo/redo.
//!
//! Entries are immutable snapshots of the dataset taken before a mutation.
//! Because dataset collections are shared through `Arc`, pushing an entry
//! costs two reference-count increments rather than a deep copy.

use super::action::ActionKind;
use super::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of entries retained by each history stack.
pub const HISTORY_LIMIT: usize = 50;

/// Snapshot of the dataset at one point in history.
///
/// `action_id` is set when the snapshot was taken for an optimistic mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub snapshot: Dataset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
}

impl HistoryEntry {
    pub fn new(snapshot: Dataset) -> Self {
        Self {
            snapshot,
            action_id: None,
        }
    }

    pub fn tagged(snapshot: Dataset, action_id: Option<String>) -> Self {
        Self {
            snapshot,
            action_id,
        }
    }
}

/// A dataset change applied while at least one optimistic action was pending.
///
/// `base` is the dataset the change was applied to. Rolling back a pending
/// action restores its `base` and replays every later entry on top of it, so
/// the journal is never subject to [`HISTORY_LIMIT`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    pub optimistic: bool,
    /// Whether the change pushed an entry onto the past stack
    pub recorded: bool,
    pub base: Dataset,
}

/// A stack of history entries bounded to [`HISTORY_LIMIT`].
///
/// Pushing onto a full stack silently evicts the oldest entry.
///
/// # Example
///
/// ```rust
/// use fitstore::core::{Dataset, HistoryEntry, HistoryStack, HISTORY_LIMIT};
///
/// let mut stack = HistoryStack::new();
/// for _ in 0..HISTORY_LIMIT + 5 {
///     stack.push(HistoryEntry::new(Dataset::default()));
/// }
/// assert_eq!(stack.len(), HISTORY_LIMIT);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStack {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Push an entry, evicting the oldest one when the bound is reached.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == HISTORY_LIMIT {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Remove up to `count` of the most recent entries.
    ///
    /// Returns how many were actually removed.
    pub fn drop_newest(&mut self, count: usize) -> usize {
        let keep = self.entries.len().saturating_sub(count);
        let removed = self.entries.len() - keep;
        self.entries.truncate(keep);
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
