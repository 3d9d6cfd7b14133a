//! Fluent builders for registering transitions.
//!
//! Builders borrow the machine they register into, so a builder can never
//! outlive its machine. Validation happens in the machine when `create` is
//! called; a failed `create` leaves the machine untouched.

pub mod batch;
pub mod error;
pub mod transition;

pub use batch::{TransitionBatch, TransitionBatchBuilder};
pub use error::TransitionCreationError;
pub use transition::TransitionBuilder;
