//! Validation of member and class payloads before they are dispatched.
//!
//! The reducer trusts its input, so structural and business rules are
//! checked here, at the edge, by whoever builds the action. Checks use
//! Stillwater's `Validation` type to accumulate ALL violations instead of
//! stopping at the first one, so a form can report every problem at once.
//!
//! # Example
//!
//! ```rust
//! use fitstore::core::{Dataset, FitnessClass};
//! use fitstore::validation::{class_rules, into_result, ValidationError};
//!
//! let class = FitnessClass::new("", "Kim", "Mon 18:00", 0);
//! let errors = into_result(class_rules().validate(&class, &Dataset::default())).unwrap_err();
//!
//! assert_eq!(errors.len(), 2);
//! assert!(errors.iter().any(|e| *e == ValidationError::NonPositiveCapacity));
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

// Re-export commonly used types
pub use builder::RulesBuilder;
pub use context::RuleContext;
pub use rules::{class_rules, into_result, member_rules, validate_action, Rules};
pub use violations::{ValidationError, Violations};
