//! Optimistic-update protocol types.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced to the caller of an optimistic dispatch.
///
/// Either way the tentative mutation has already been rolled back and the
/// reason recorded in the store's error map under `action_id`.
#[derive(Debug, Error)]
pub enum OptimisticError<E> {
    #[error("Confirmation for action {action_id} failed: {error}")]
    Failed { action_id: String, error: E },

    #[error("Confirmation for action {action_id} timed out after {timeout:?}")]
    TimedOut { action_id: String, timeout: Duration },
}

impl<E> OptimisticError<E> {
    /// Correlation id of the rolled-back action.
    pub fn action_id(&self) -> &str {
        match self {
            Self::Failed { action_id, .. } | Self::TimedOut { action_id, .. } => action_id,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Error returned by the simulated confirmations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ConfirmationError(pub String);

/// Fresh correlation id for an optimistic action.
pub fn new_action_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Stand-in for a backend call that succeeds after `latency`.
///
/// Useful when no real backend exists yet: the optimistic protocol runs
/// end to end with a realistic delay.
pub fn simulated_confirmation(
    latency: Duration,
) -> impl Future<Output = Result<(), ConfirmationError>> {
    async move {
        tokio::time::sleep(latency).await;
        Ok(())
    }
}

/// Stand-in for a backend call that rejects after `latency`.
pub fn simulated_rejection(
    latency: Duration,
    message: impl Into<String>,
) -> impl Future<Output = Result<(), ConfirmationError>> {
    let message = message.into();
    async move {
        tokio::time::sleep(latency).await;
        Err(ConfirmationError(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_ids_are_unique() {
        assert_ne!(new_action_id(), new_action_id());
    }

    #[test]
    fn error_exposes_action_id() {
        let failed: OptimisticError<ConfirmationError> = OptimisticError::Failed {
            action_id: "a".to_string(),
            error: ConfirmationError("offline".to_string()),
        };
        let timed_out: OptimisticError<ConfirmationError> = OptimisticError::TimedOut {
            action_id: "b".to_string(),
            timeout: Duration::from_millis(10),
        };

        assert_eq!(failed.action_id(), "a");
        assert!(!failed.is_timeout());
        assert_eq!(timed_out.action_id(), "b");
        assert!(timed_out.is_timeout());
        assert_eq!(
            failed.to_string(),
            "Confirmation for action a failed: offline"
        );
    }

    #[tokio::test]
    async fn simulated_calls_resolve() {
        assert!(simulated_confirmation(Duration::from_millis(1)).await.is_ok());
        assert_eq!(
            simulated_rejection(Duration::from_millis(1), "nope").await,
            Err(ConfirmationError("nope".to_string()))
        );
    }
}
