//! Context provided to validation checks.

use crate::core::Dataset;

/// The payload under validation and the dataset it will be applied to.
#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a, T> {
    pub subject: &'a T,
    pub dataset: &'a Dataset,
}

impl<'a, T> RuleContext<'a, T> {
    pub fn new(subject: &'a T, dataset: &'a Dataset) -> Self {
        Self { subject, dataset }
    }
}
