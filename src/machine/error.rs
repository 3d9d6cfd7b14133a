//! Errors raised when firing events.

use thiserror::Error;

/// Reasons a `fire` call did not change state.
///
/// In every case the current state is left exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FireError {
    #[error("Current state cannot be unset. Construct with an initial state or call set_current_state")]
    InvalidState,

    #[error("No transitions defined for state machine")]
    NoTransitionsDefined,

    #[error("No transitions defined for event '{event}'")]
    NoTransitionForEvent { event: String },

    #[error("No transitions defined from current state '{state}' for event '{event}'")]
    NoTransitionFromState { state: String, event: String },

    #[error("Condition not met for transition from '{from}' to '{to}' on '{on}'")]
    ConditionNotMet { from: String, to: String, on: String },
}

impl FireError {
    /// True for the lookup failures: no rule could be found for the event.
    pub fn is_no_transition(&self) -> bool {
        matches!(
            self,
            Self::NoTransitionsDefined
                | Self::NoTransitionForEvent { .. }
                | Self::NoTransitionFromState { .. }
        )
    }

    /// True when a guard rejected an otherwise applicable transition.
    pub fn is_condition_not_met(&self) -> bool {
        matches!(self, Self::ConditionNotMet { .. })
    }
}
