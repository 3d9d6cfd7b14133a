//! Core building blocks of the engine.
//!
//! - State and event bounds via the `State` and `Event` traits
//! - Guard conditions and listener capabilities
//! - Transition drafts and validated transition rules
//! - History of fired transitions

mod condition;
mod history;
mod state;
mod transition;

pub use condition::{
    Condition, SharedCondition, SharedSuccessListener, StateChangeListener, SuccessListener,
};
pub use history::{FiredTransition, TransitionHistory};
pub use state::{Event, State};
pub use transition::{Transition, TransitionDraft};
