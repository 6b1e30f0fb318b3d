//! The imperative shell around the pure core.
//!
//! This module owns the live store state and everything that touches the
//! outside world: awaiting backend confirmations, timers, and persistence.
//!
//! # Key Concepts
//!
//! - **Store**: Cloneable handle serializing every reducer transition
//! - **Optimistic dispatch**: Apply now, confirm later, roll back on failure
//! - **Effects**: Confirmations are plain futures or Stillwater effects
//!
//! # Example
//!
//! ```rust
//! use fitstore::core::{ActionKind, FitnessClass};
//! use fitstore::effects::{simulated_confirmation, Store};
//! use std::time::Duration;
//!
//! # tokio_test_block();
//! # fn tokio_test_block() {
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
//! # rt.block_on(async {
//! let store = Store::default();
//! let class = FitnessClass::new("Spin", "Lee", "Tue 07:00", 12);
//!
//! store
//!     .optimistic_dispatch(
//!         ActionKind::AddClass(class),
//!         simulated_confirmation(Duration::from_millis(1)),
//!     )
//!     .await
//!     .unwrap();
//!
//! assert_eq!(store.dataset().classes().len(), 1);
//! assert!(store.pending_actions().is_empty());
//! # });
//! # }
//! ```

mod optimistic;
mod store;

pub use optimistic::{
    new_action_id, simulated_confirmation, simulated_rejection, ConfirmationError,
    OptimisticError,
};
pub use store::Store;
