//! The state machine and its transition table.
//!
//! - **Registry**: transitions keyed by event, then origin state
//! - **StateMachine**: owns the current state, registers validated
//!   transitions and dispatches fired events
//! - **FireError**: why a fire did not change state

mod error;
mod registry;
mod state_machine;

pub use error::FireError;
pub use registry::Registry;
pub use state_machine::{FireOutcome, StateMachine};
