//! The dispatch coordinator: the mutable boundary around the pure reducer.

use crate::builder::StoreConfig;
use crate::checkpoint::{Checkpoint, CheckpointError, Persistence};
use crate::core::{reduce, Action, ActionKind, Dataset, EnhancedDatasetState, RollbackReason};
use crate::effects::optimistic::{new_action_id, OptimisticError};
use crate::validation::{into_result, validate_action, Violations};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use stillwater::effect::Effect;
use stillwater::prelude::*;
use tracing::{debug, info, warn};

/// Handle to a store instance.
///
/// Cloning is cheap and every clone addresses the same state, so the store
/// is built once and handed to whoever needs it. Every transition runs under
/// one lock, which serializes dispatches in arrival order; the lock is never
/// held across an await.
#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<EnhancedDatasetState>>,
    config: Arc<StoreConfig>,
    persistence: Option<Arc<dyn Persistence>>,
}

impl Store {
    /// Create a store over `dataset` with default configuration.
    pub fn new(dataset: Dataset) -> Self {
        Self::from_parts(dataset, StoreConfig::default(), None)
    }

    pub(crate) fn from_parts(
        dataset: Dataset,
        config: StoreConfig,
        persistence: Option<Arc<dyn Persistence>>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(EnhancedDatasetState::new(dataset))),
            config: Arc::new(config),
            persistence,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, EnhancedDatasetState> {
        // The reducer cannot leave a half-written state behind, so a
        // poisoned lock still guards a consistent value.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(state: &mut EnhancedDatasetState, action: &Action) {
        debug!(
            action = action.kind.name(),
            action_id = action.meta.action_id.as_deref(),
            optimistic = action.meta.optimistic,
            skip_history = action.meta.skip_history,
            "dispatch"
        );
        let current = std::mem::take(state);
        *state = reduce(current, action);
    }

    /// Hand an action to the reducer.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        let mut state = self.lock();
        Self::transition(&mut state, &action);
    }

    /// Validate the action's payload against the current dataset, then dispatch it.
    ///
    /// Nothing is dispatched when any rule fails; every violation is returned.
    pub fn dispatch_checked(&self, action: impl Into<Action>) -> Result<(), Violations> {
        let action = action.into();
        let mut state = self.lock();
        into_result(validate_action(&action.kind, &state.dataset))?;
        Self::transition(&mut state, &action);
        Ok(())
    }

    /// Apply `kind` immediately, then commit or roll it back depending on `effect`.
    ///
    /// Uses the configured timeout. See
    /// [`optimistic_dispatch_with_timeout`](Self::optimistic_dispatch_with_timeout).
    pub async fn optimistic_dispatch<F, T, E>(
        &self,
        kind: ActionKind,
        effect: F,
    ) -> Result<T, OptimisticError<E>>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let timeout = self.config.optimistic_timeout();
        self.optimistic_dispatch_with_timeout(kind, effect, timeout)
            .await
    }

    /// Apply `kind` immediately under a fresh correlation id and await `effect`.
    ///
    /// - success: yields to the scheduler, then dispatches the commit
    /// - failure or timeout: dispatches the rollback, records the reason in
    ///   the error map, and returns the error
    ///
    /// The timer lives inside this future, so it is gone on every exit path
    /// and can never fire after the action resolved.
    pub async fn optimistic_dispatch_with_timeout<F, T, E>(
        &self,
        kind: ActionKind,
        effect: F,
        timeout: Duration,
    ) -> Result<T, OptimisticError<E>>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let action_id = new_action_id();
        self.dispatch(Action::optimistic(kind.clone(), action_id.clone()));

        match tokio::time::timeout(timeout, effect).await {
            Ok(Ok(value)) => {
                tokio::task::yield_now().await;
                self.commit(kind, &action_id);
                Ok(value)
            }
            Ok(Err(error)) => {
                self.roll_back(&action_id, RollbackReason::failed(error.to_string()));
                Err(OptimisticError::Failed { action_id, error })
            }
            Err(_) => {
                self.roll_back(&action_id, RollbackReason::timed_out(timeout));
                Err(OptimisticError::TimedOut { action_id, timeout })
            }
        }
    }

    /// Optimistic dispatch confirmed by a Stillwater effect run against `env`.
    pub async fn optimistic_dispatch_effect<Eff>(
        &self,
        kind: ActionKind,
        effect: Eff,
        env: &Eff::Env,
    ) -> Result<Eff::Output, OptimisticError<Eff::Error>>
    where
        Eff: Effect,
        Eff::Error: Display,
    {
        self.optimistic_dispatch(kind, effect.run(env)).await
    }

    fn commit(&self, kind: ActionKind, action_id: &str) {
        let mut state = self.lock();
        if !state.is_pending(action_id) {
            debug!(action_id, "dropping commit for action that is no longer pending");
            return;
        }
        Self::transition(&mut state, &Action::commit(kind, action_id));
        info!(action_id, "optimistic action committed");
    }

    fn roll_back(&self, action_id: &str, reason: RollbackReason) {
        warn!(action_id, %reason, "rolling back optimistic action");
        let mut state = self.lock();
        Self::transition(&mut state, &Action::rollback(action_id));
        Self::transition(
            &mut state,
            &Action::new(ActionKind::RecordError {
                action_id: action_id.to_string(),
                reason,
            }),
        );
    }

    /// Dispatch `actions` in order after one scheduler yield.
    ///
    /// Not atomic: each action is its own transition with its own history
    /// entry, and nothing is undone if a later action turns out to be invalid.
    /// Use `BATCH_UPDATE_MEMBERS`/`BATCH_UPDATE_CLASSES` for a single undo step.
    pub async fn batch_dispatch(&self, actions: Vec<Action>) {
        tokio::task::yield_now().await;
        for action in actions {
            self.dispatch(action);
        }
    }

    pub fn undo(&self) {
        self.dispatch(ActionKind::Undo);
    }

    pub fn redo(&self) {
        self.dispatch(ActionKind::Redo);
    }

    pub fn clear_history(&self) {
        self.dispatch(ActionKind::ClearHistory);
    }

    /// Forget the recorded error for one action.
    pub fn clear_error(&self, action_id: impl Into<String>) {
        self.dispatch(ActionKind::ClearError(action_id.into()));
    }

    /// Immutable snapshot of the full state.
    pub fn state(&self) -> EnhancedDatasetState {
        self.lock().clone()
    }

    pub fn dataset(&self) -> Dataset {
        self.lock().dataset.clone()
    }

    pub fn can_undo(&self) -> bool {
        self.lock().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.lock().can_redo()
    }

    pub fn is_optimistic(&self) -> bool {
        self.lock().is_optimistic
    }

    pub fn pending_actions(&self) -> BTreeSet<String> {
        self.lock().pending_actions.clone()
    }

    pub fn errors(&self) -> BTreeMap<String, RollbackReason> {
        self.lock().errors.clone()
    }

    fn provider(&self) -> Result<&Arc<dyn Persistence>, CheckpointError> {
        self.persistence.as_ref().ok_or(CheckpointError::NoProvider)
    }

    /// Replace the dataset with the one stored under the configured key.
    ///
    /// Hydration bypasses history, so it cannot be undone. Returns `false`
    /// when the provider holds nothing under the key.
    pub fn hydrate(&self) -> Result<bool, CheckpointError> {
        let provider = self.provider()?;
        let Some(raw) = provider.load(&self.config.storage_key)? else {
            debug!(key = %self.config.storage_key, "nothing to hydrate");
            return Ok(false);
        };

        let checkpoint = Checkpoint::from_json(&raw)?;
        debug!(key = %self.config.storage_key, checkpoint = %checkpoint.id, "hydrating");
        self.dispatch(Action::new(ActionKind::SetDataset(checkpoint.dataset)).skip_history());
        Ok(true)
    }

    /// Write the current dataset under the configured key.
    pub fn flush(&self) -> Result<(), CheckpointError> {
        let provider = self.provider()?;
        let checkpoint = Checkpoint::new(self.dataset());
        provider.save(&self.config.storage_key, &checkpoint.to_json()?)?;
        debug!(key = %self.config.storage_key, checkpoint = %checkpoint.id, "flushed");
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Dataset::default())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.lock())
            .field("config", &self.config)
            .field("persistence", &self.persistence.is_some())
            .finish()
    }
}
