//! Errors raised while registering transitions.

use thiserror::Error;

/// Structural problems detected when a transition or batch is applied.
///
/// Registration is atomic: when any of these is returned, nothing was added
/// to the machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionCreationError {
    #[error("From state should be defined. Call .from(state)")]
    MissingFromState,

    #[error("On event should be defined. Call .on(event)")]
    MissingEvent,

    #[error("A transition should either be ignored or have a target state. Call .to(state) or .ignore()")]
    MissingTarget,

    #[error("From states should be defined for a batch. Call .from_any(states)")]
    MissingFromStates,

    #[error("On events should be defined for a batch. Call .on_each(events)")]
    MissingEvents,

    #[error("A batch should either be ignored or have target states. Call .to_among(states) or .ignore()")]
    MissingTargets,

    #[error(
        "Ambiguous batch: cannot broadcast {from_any} from states, {to_among} target states \
         and {on_each} events together. Sequences longer than one must have equal lengths"
    )]
    AmbiguousLengths {
        from_any: usize,
        to_among: usize,
        on_each: usize,
    },

    #[error(
        "Ambiguous batch: a single transition from '{from}' on '{on}' cannot lead to {targets} target states"
    )]
    AmbiguousFanOut {
        from: String,
        on: String,
        targets: usize,
    },

    #[error("A transition from '{from}' on '{on}' is already registered")]
    DuplicateTransition { from: String, on: String },
}
