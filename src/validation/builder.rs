//! Builder API for creating validation rules.

use crate::validation::context::RuleContext;
use crate::validation::rules::{Rules, ValidationCheck};
use crate::validation::violations::ValidationError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating validation rules
pub struct RulesBuilder<T> {
    checks: Vec<ValidationCheck<T>>,
}

impl<T> RulesBuilder<T> {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&RuleContext<'_, T>) -> Validation<(), NonEmptyVec<ValidationError>>
            + Send
            + Sync
            + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Add a predicate check that reports `error` when it does not hold
    pub fn require_that<F>(self, predicate: F, error: ValidationError) -> Self
    where
        F: Fn(&RuleContext<'_, T>) -> bool + Send + Sync + 'static,
    {
        self.require(move |ctx| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(error.clone())
            }
        })
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&RuleContext<'_, T>) -> bool + Send + Sync + 'static,
    {
        self.require_that(
            predicate,
            ValidationError::CustomCheckFailed { message: error_msg },
        )
    }

    /// Build the validation rules
    pub fn build(self) -> Rules<T> {
        Rules {
            checks: self.checks,
        }
    }
}

impl<T> Default for RulesBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
