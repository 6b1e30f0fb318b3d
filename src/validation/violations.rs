//! Validation errors.

use crate::core::MemberId;
use thiserror::Error;

/// A single rule a payload failed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    MissingField { field: &'static str },

    #[error("'{email}' is not a valid email address")]
    InvalidEmail { email: String },

    #[error("Capacity must be positive")]
    NonPositiveCapacity,

    #[error("{enrolled} members enrolled but capacity is {capacity}")]
    OverCapacity { enrolled: usize, capacity: u32 },

    #[error("Enrolled member {0} does not exist")]
    UnknownMember(MemberId),

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}

/// Every violation found in one payload.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{count} validation error(s)", count = .0.len())]
pub struct Violations(pub Vec<ValidationError>);

impl Violations {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
