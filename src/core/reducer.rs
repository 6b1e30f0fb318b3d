//! The pure transition function of the store.
//!
//! `reduce` is total and deterministic: it never panics on well-formed input,
//! never reads clocks or randomness, and returns the input state untouched
//! when an action does not apply.

use super::action::{Action, ActionKind};
use super::dataset::Dataset;
use super::history::{HistoryEntry, JournalEntry};
use super::state::EnhancedDatasetState;

/// Compute the state that follows `state` after `action`.
///
/// # Example
///
/// ```rust
/// use fitstore::core::{reduce, Action, ActionKind, EnhancedDatasetState};
///
/// let state = EnhancedDatasetState::default();
/// let state = reduce(state, &Action::new(ActionKind::DeleteMember(1)));
/// assert!(state.can_undo());
///
/// let state = reduce(state, &Action::new(ActionKind::Undo));
/// assert!(!state.can_undo());
/// assert!(state.can_redo());
/// ```
pub fn reduce(state: EnhancedDatasetState, action: &Action) -> EnhancedDatasetState {
    match &action.kind {
        ActionKind::Undo => match action.meta.action_id.as_deref() {
            Some(id) if action.meta.skip_history => rollback(state, id),
            _ => undo(state, action.meta.skip_history),
        },
        ActionKind::Redo => redo(state, action.meta.skip_history),
        ActionKind::ClearHistory => clear_history(state),
        ActionKind::RecordError { action_id, reason } => {
            let mut state = state;
            state.errors.insert(action_id.clone(), reason.clone());
            state
        }
        ActionKind::ClearError(action_id) => {
            let mut state = state;
            state.errors.remove(action_id);
            state
        }
        ActionKind::Unknown => state,
        kind => mutate(state, kind, action),
    }
}

fn apply(mut dataset: Dataset, kind: &ActionKind) -> Dataset {
    match kind {
        ActionKind::SetDataset(next) => return next.clone(),
        ActionKind::AddMember(member) => dataset.upsert_member(member),
        ActionKind::UpdateMember(member) => dataset.update_member(member),
        ActionKind::DeleteMember(id) => dataset.delete_member(*id),
        ActionKind::AddClass(class) => dataset.upsert_class(class),
        ActionKind::UpdateClass(class) => dataset.update_class(class),
        ActionKind::DeleteClass(id) => dataset.delete_class(*id),
        ActionKind::BatchUpdateMembers(members) => dataset.replace_members(members),
        ActionKind::BatchUpdateClasses(classes) => dataset.replace_classes(classes),
        ActionKind::Undo
        | ActionKind::Redo
        | ActionKind::ClearHistory
        | ActionKind::RecordError { .. }
        | ActionKind::ClearError(_)
        | ActionKind::Unknown => {}
    }
    dataset
}

fn mutate(mut state: EnhancedDatasetState, kind: &ActionKind, action: &Action) -> EnhancedDatasetState {
    let meta = &action.meta;

    // A non-optimistic mutation with a correlation id confirms that id.
    let committing = !meta.optimistic && meta.action_id.is_some();
    if committing {
        if let Some(id) = meta.action_id.as_deref() {
            if !state.is_pending(id) {
                return state;
            }
            state.pending_actions.remove(id);
        }
    }

    let before = state.dataset.clone();
    state.dataset = apply(before.clone(), kind);

    if !meta.skip_history {
        state
            .past
            .push(HistoryEntry::tagged(before.clone(), meta.action_id.clone()));
        state.future.clear();
    }

    state.is_optimistic = meta.optimistic;
    if meta.optimistic {
        if let Some(id) = &meta.action_id {
            state.pending_actions.insert(id.clone());
        }
    }

    if state.pending_actions.is_empty() {
        state.journal.clear();
    } else {
        state.journal.push(JournalEntry {
            kind: kind.clone(),
            action_id: meta.action_id.clone(),
            optimistic: meta.optimistic,
            recorded: !meta.skip_history,
            base: before,
        });
    }
    state
}

fn undo(mut state: EnhancedDatasetState, skip_history: bool) -> EnhancedDatasetState {
    let Some(entry) = state.past.pop() else {
        return state;
    };

    let current = std::mem::replace(&mut state.dataset, entry.snapshot);
    if !skip_history {
        state.future.push(HistoryEntry::new(current));
    }
    state.is_optimistic = false;
    state.pending_actions.clear();
    state.journal.clear();
    state
}

fn redo(mut state: EnhancedDatasetState, skip_history: bool) -> EnhancedDatasetState {
    let Some(entry) = state.future.pop() else {
        return state;
    };

    let current = std::mem::replace(&mut state.dataset, entry.snapshot);
    if !skip_history {
        state.past.push(HistoryEntry::new(current));
    }
    state.is_optimistic = false;
    state.pending_actions.clear();
    state.journal.clear();
    state
}

/// Revert the optimistic mutation tracked under `action_id`.
///
/// Restores the dataset the mutation was applied to, then replays every
/// change made after it, so other optimistic actions (pending or committed)
/// and plain edits survive. The past stack is rewound over the replayed
/// changes and rebuilt from fresh snapshots. Nothing is pushed to the future
/// stack.
fn rollback(mut state: EnhancedDatasetState, action_id: &str) -> EnhancedDatasetState {
    if !state.is_pending(action_id) {
        return state;
    }
    state.pending_actions.remove(action_id);

    let position = state
        .journal
        .iter()
        .position(|e| e.optimistic && e.action_id.as_deref() == Some(action_id));

    if let Some(index) = position {
        let mut later = state.journal.split_off(index).into_iter();
        if let Some(target) = later.next() {
            let later: Vec<JournalEntry> = later.collect();
            let rewound =
                later.iter().filter(|e| e.recorded).count() + usize::from(target.recorded);
            state.past.drop_newest(rewound);
            state.dataset = target.base;

            for mut entry in later {
                let base = state.dataset.clone();
                if entry.recorded {
                    state
                        .past
                        .push(HistoryEntry::tagged(base.clone(), entry.action_id.clone()));
                }
                state.dataset = apply(base.clone(), &entry.kind);
                entry.base = base;
                state.journal.push(entry);
            }
        }
    }

    if state.pending_actions.is_empty() {
        state.journal.clear();
    }
    state.is_optimistic = !state.pending_actions.is_empty();
    state
}

fn clear_history(mut state: EnhancedDatasetState) -> EnhancedDatasetState {
    state.journal.clear();
    state.past.clear();
    state.future.clear();
    state.pending_actions.clear();
    state.errors.clear();
    state.is_optimistic = false;
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::ActionMeta;
    use crate::core::dataset::{FitnessClass, Member, MembershipType};
    use crate::core::history::HISTORY_LIMIT;
    use crate::core::state::RollbackReason;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn member(id: i64) -> Member {
        Member {
            id,
            name: format!("Member {id}"),
            email: format!("m{id}@gym.test"),
            phone: "555-0199".to_string(),
            membership_type: MembershipType::Premium,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    fn class(id: i64, capacity: u32, enrolled: &[i64]) -> FitnessClass {
        FitnessClass {
            id,
            name: "Spin".to_string(),
            instructor: "Lee".to_string(),
            schedule: "Tue 07:00".to_string(),
            capacity,
            enrolled: enrolled.iter().copied().collect(),
        }
    }

    fn run(state: EnhancedDatasetState, actions: &[Action]) -> EnhancedDatasetState {
        actions.iter().fold(state, reduce)
    }

    fn plain(kind: ActionKind) -> Action {
        Action::new(kind)
    }

    #[test]
    fn mutation_pushes_pre_mutation_snapshot() {
        let state = reduce(
            EnhancedDatasetState::default(),
            &plain(ActionKind::AddMember(member(1))),
        );

        assert_eq!(state.dataset.members().len(), 1);
        assert_eq!(state.past.len(), 1);
        assert!(state.past.peek().unwrap().snapshot.members().is_empty());
    }

    #[test]
    fn skip_history_leaves_stacks_alone() {
        let state = run(
            EnhancedDatasetState::default(),
            &[
                plain(ActionKind::AddMember(member(1))),
                plain(ActionKind::Undo),
            ],
        );
        assert_eq!(state.future.len(), 1);

        let state = reduce(state, &plain(ActionKind::AddMember(member(2))).skip_history());

        assert_eq!(state.past.len(), 0);
        assert_eq!(state.future.len(), 1);
    }

    #[test]
    fn new_mutation_clears_future() {
        let state = run(
            EnhancedDatasetState::default(),
            &[
                plain(ActionKind::AddMember(member(1))),
                plain(ActionKind::Undo),
                plain(ActionKind::AddMember(member(2))),
            ],
        );

        assert!(!state.can_redo());
        assert_eq!(state.dataset.members()[0].id, 2);
    }

    #[test]
    fn undo_and_redo_round_trip() {
        let start = EnhancedDatasetState::default();
        let state = run(
            start.clone(),
            &[
                plain(ActionKind::AddMember(member(1))),
                plain(ActionKind::AddClass(class(10, 2, &[]))),
            ],
        );
        let after = state.dataset.clone();

        let state = run(state, &[plain(ActionKind::Undo), plain(ActionKind::Undo)]);
        assert_eq!(state.dataset, start.dataset);

        let state = run(state, &[plain(ActionKind::Redo), plain(ActionKind::Redo)]);
        assert_eq!(state.dataset, after);
        assert!(!state.can_redo());
    }

    #[test]
    fn undo_on_empty_past_is_a_no_op() {
        let state = EnhancedDatasetState::new(Dataset::new(vec![member(1)], vec![]));
        let dataset = state.dataset.clone();

        let next = reduce(state.clone(), &plain(ActionKind::Undo));

        assert_eq!(next, state);
        assert!(next.dataset.shares_storage_with(&dataset));
    }

    #[test]
    fn redo_on_empty_future_is_a_no_op() {
        let state = EnhancedDatasetState::new(Dataset::new(vec![member(1)], vec![]));
        assert_eq!(reduce(state.clone(), &plain(ActionKind::Redo)), state);
    }

    #[test]
    fn delete_member_cascades_enrollment() {
        let state = run(
            EnhancedDatasetState::default(),
            &[
                plain(ActionKind::AddMember(member(1))),
                plain(ActionKind::AddMember(member(2))),
                plain(ActionKind::AddClass(class(10, 2, &[1, 2]))),
                plain(ActionKind::DeleteMember(1)),
            ],
        );

        assert_eq!(state.dataset.classes()[0].enrolled, BTreeSet::from([2]));
        assert!(state.dataset.member(1).is_none());
    }

    #[test]
    fn batch_update_records_one_entry() {
        let state = reduce(
            EnhancedDatasetState::default(),
            &plain(ActionKind::BatchUpdateMembers(vec![member(1), member(2), member(3)])),
        );

        assert_eq!(state.dataset.members().len(), 3);
        assert_eq!(state.past.len(), 1);
    }

    #[test]
    fn past_is_bounded() {
        let actions: Vec<Action> = (0..(HISTORY_LIMIT as i64 + 20))
            .map(|i| plain(ActionKind::AddMember(member(i))))
            .collect();

        let state = run(EnhancedDatasetState::default(), &actions);

        assert_eq!(state.past.len(), HISTORY_LIMIT);
    }

    #[test]
    fn optimistic_mutation_marks_pending() {
        let state = reduce(
            EnhancedDatasetState::default(),
            &Action::optimistic(ActionKind::AddMember(member(1)), "op-1"),
        );

        assert!(state.is_optimistic);
        assert!(state.is_pending("op-1"));
        assert_eq!(state.past.peek().unwrap().action_id.as_deref(), Some("op-1"));
    }

    #[test]
    fn commit_clears_pending_without_new_history() {
        let kind = ActionKind::AddMember(member(1));
        let state = run(
            EnhancedDatasetState::default(),
            &[
                Action::optimistic(kind.clone(), "op-1"),
                Action::commit(kind, "op-1"),
            ],
        );

        assert!(!state.is_optimistic);
        assert!(state.pending_actions.is_empty());
        assert_eq!(state.past.len(), 1);
        assert_eq!(state.dataset.members().len(), 1);
    }

    #[test]
    fn late_commit_is_dropped() {
        let kind = ActionKind::AddMember(member(1));
        let state = run(
            EnhancedDatasetState::default(),
            &[
                Action::optimistic(kind.clone(), "op-1"),
                Action::rollback("op-1"),
            ],
        );

        let next = reduce(state.clone(), &Action::commit(kind, "op-1"));

        assert_eq!(next, state);
        assert!(next.dataset.members().is_empty());
    }

    #[test]
    fn rollback_restores_snapshot_without_future() {
        let state = run(
            EnhancedDatasetState::default(),
            &[
                plain(ActionKind::AddMember(member(1))),
                Action::optimistic(ActionKind::DeleteMember(1), "op-1"),
                Action::rollback("op-1"),
            ],
        );

        assert_eq!(state.dataset.members().len(), 1);
        assert!(!state.can_redo());
        assert_eq!(state.past.len(), 1);
        assert!(!state.is_pending("op-1"));
        assert!(!state.is_optimistic);
    }

    #[test]
    fn rollback_of_resolved_action_is_a_no_op() {
        let kind = ActionKind::AddMember(member(1));
        let state = run(
            EnhancedDatasetState::default(),
            &[
                Action::optimistic(kind.clone(), "op-1"),
                Action::commit(kind, "op-1"),
            ],
        );

        let next = reduce(state.clone(), &Action::rollback("op-1"));

        assert_eq!(next, state);
    }

    #[test]
    fn rollback_targets_its_own_snapshot() {
        let state = run(
            EnhancedDatasetState::default(),
            &[
                Action::optimistic(ActionKind::AddMember(member(1)), "first"),
                Action::optimistic(ActionKind::AddMember(member(2)), "second"),
                Action::rollback("second"),
            ],
        );

        assert_eq!(state.dataset.members().len(), 1);
        assert!(state.is_pending("first"));
        assert!(state.is_optimistic);

        let state = reduce(state, &Action::rollback("first"));
        assert!(state.dataset.members().is_empty());
        assert!(state.pending_actions.is_empty());
    }

    #[test]
    fn rollback_of_earlier_action_keeps_later_ones() {
        let state = run(
            EnhancedDatasetState::default(),
            &[
                Action::optimistic(ActionKind::AddMember(member(1)), "first"),
                Action::optimistic(ActionKind::AddMember(member(2)), "second"),
                Action::rollback("first"),
            ],
        );

        assert!(state.dataset.member(1).is_none());
        assert!(state.dataset.member(2).is_some());
        assert_eq!(state.pending_actions, BTreeSet::from(["second".to_string()]));
        assert_eq!(state.past.len(), 1);
        assert!(state.past.peek().unwrap().snapshot.members().is_empty());

        let state = reduce(state, &Action::commit(ActionKind::AddMember(member(2)), "second"));
        assert_eq!(state.dataset.members().len(), 1);
        assert!(state.journal.is_empty());
    }

    #[test]
    fn late_failure_keeps_committed_and_plain_changes() {
        let state = run(
            EnhancedDatasetState::default(),
            &[
                Action::optimistic(ActionKind::AddMember(member(1)), "slow"),
                Action::optimistic(ActionKind::AddMember(member(2)), "fast"),
                Action::commit(ActionKind::AddMember(member(2)), "fast"),
                plain(ActionKind::AddClass(class(10, 4, &[2]))),
                Action::rollback("slow"),
            ],
        );

        assert!(state.dataset.member(1).is_none());
        assert!(state.dataset.member(2).is_some());
        assert_eq!(state.dataset.classes().len(), 1);
        assert!(state.pending_actions.is_empty());
        assert!(!state.is_optimistic);
        assert!(state.journal.is_empty());
        assert_eq!(state.past.len(), 2);

        let state = run(state, &[plain(ActionKind::Undo), plain(ActionKind::Undo)]);
        assert!(state.dataset.members().is_empty());
        assert!(state.dataset.classes().is_empty());
    }

    #[test]
    fn rollback_survives_history_eviction() {
        let mut actions = vec![Action::optimistic(ActionKind::AddMember(member(1)), "op-1")];
        actions.extend(
            (100..100 + HISTORY_LIMIT as i64 + 10).map(|id| plain(ActionKind::AddMember(member(id)))),
        );
        let state = run(EnhancedDatasetState::default(), &actions);
        assert!(state
            .past
            .iter()
            .all(|e| e.action_id.as_deref() != Some("op-1")));

        let state = reduce(state, &Action::rollback("op-1"));

        assert!(state.dataset.member(1).is_none());
        assert_eq!(state.dataset.members().len(), HISTORY_LIMIT + 10);
        assert_eq!(state.past.len(), HISTORY_LIMIT);
        assert!(state.pending_actions.is_empty());
    }

    #[test]
    fn journal_is_only_kept_while_actions_are_pending() {
        let state = reduce(
            EnhancedDatasetState::default(),
            &plain(ActionKind::AddMember(member(1))),
        );
        assert!(state.journal.is_empty());

        let state = run(
            state,
            &[
                Action::optimistic(ActionKind::DeleteMember(1), "op-1"),
                plain(ActionKind::AddMember(member(2))),
            ],
        );
        assert_eq!(state.journal.len(), 2);

        let state = reduce(state, &plain(ActionKind::Undo));
        assert!(state.journal.is_empty());
    }

    #[test]
    fn undo_clears_pending_actions() {
        let state = run(
            EnhancedDatasetState::default(),
            &[
                Action::optimistic(ActionKind::AddMember(member(1)), "op-1"),
                plain(ActionKind::Undo),
            ],
        );

        assert!(state.pending_actions.is_empty());
        assert!(!state.is_optimistic);
        assert!(state.can_redo());
    }

    #[test]
    fn clear_history_keeps_dataset() {
        let state = run(
            EnhancedDatasetState::default(),
            &[
                plain(ActionKind::AddMember(member(1))),
                Action::optimistic(ActionKind::AddMember(member(2)), "op-1"),
                plain(ActionKind::RecordError {
                    action_id: "old".to_string(),
                    reason: RollbackReason::failed("boom"),
                }),
                plain(ActionKind::ClearHistory),
            ],
        );

        assert_eq!(state.dataset.members().len(), 2);
        assert!(!state.can_undo());
        assert!(state.pending_actions.is_empty());
        assert!(state.errors.is_empty());
    }

    #[test]
    fn error_bookkeeping_leaves_history_alone() {
        let state = run(
            EnhancedDatasetState::default(),
            &[
                plain(ActionKind::RecordError {
                    action_id: "op-9".to_string(),
                    reason: RollbackReason::failed("offline"),
                }),
                plain(ActionKind::RecordError {
                    action_id: "op-10".to_string(),
                    reason: RollbackReason::failed("offline"),
                }),
                plain(ActionKind::ClearError("op-9".to_string())),
            ],
        );

        assert_eq!(state.errors.len(), 1);
        assert!(state.errors.contains_key("op-10"));
        assert!(!state.can_undo());
    }

    #[test]
    fn unknown_action_returns_state_unchanged() {
        let state = reduce(
            EnhancedDatasetState::default(),
            &plain(ActionKind::AddMember(member(1))),
        );
        let meta = ActionMeta {
            action_id: Some("x".to_string()),
            optimistic: true,
            skip_history: false,
        };

        let next = reduce(state.clone(), &plain(ActionKind::Unknown).with_meta(meta));

        assert_eq!(next, state);
    }

    #[test]
    fn reduce_is_deterministic() {
        let state = EnhancedDatasetState::default();
        let action = plain(ActionKind::AddClass(class(10, 5, &[])));

        assert_eq!(reduce(state.clone(), &action), reduce(state, &action));
    }

    #[test]
    fn set_dataset_replaces_everything() {
        let dataset = Dataset::new(vec![member(1)], vec![class(10, 1, &[1])]);
        let state = reduce(
            EnhancedDatasetState::default(),
            &plain(ActionKind::SetDataset(dataset.clone())).skip_history(),
        );

        assert_eq!(state.dataset, dataset);
        assert!(!state.can_undo());
    }
}
