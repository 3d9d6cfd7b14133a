//! Transition rules.
//!
//! A [`TransitionDraft`] is what a builder collects; it may be incomplete.
//! A [`Transition`] is the validated, immutable rule stored in the registry.

use super::condition::{SharedCondition, SharedSuccessListener};
use super::state::{Event, State};
use crate::builder::TransitionCreationError;
use std::fmt;

/// Unvalidated transition request, as collected by a builder.
///
/// Drafts are turned into [`Transition`]s by [`TransitionDraft::validate`],
/// which `StateMachine::apply` calls before touching the registry.
pub struct TransitionDraft<S: State, E: Event> {
    pub from: Option<S>,
    pub to: Option<S>,
    pub on: Option<E>,
    pub ignore: bool,
    pub condition: Option<SharedCondition>,
    pub on_success: Option<SharedSuccessListener<S, E>>,
}

impl<S: State, E: Event> TransitionDraft<S, E> {
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            on: None,
            ignore: false,
            condition: None,
            on_success: None,
        }
    }

    /// Check the structural rules and produce an immutable transition.
    ///
    /// `from` and `on` are mandatory, and the draft must either be ignored or
    /// name a target. When both are given, the target is dropped.
    pub fn validate(self) -> Result<Transition<S, E>, TransitionCreationError> {
        let from = self.from.ok_or(TransitionCreationError::MissingFromState)?;
        let on = self.on.ok_or(TransitionCreationError::MissingEvent)?;

        let to = if self.ignore {
            None
        } else {
            Some(self.to.ok_or(TransitionCreationError::MissingTarget)?)
        };

        Ok(Transition {
            from,
            to,
            on,
            condition: self.condition,
            on_success: self.on_success,
        })
    }
}

impl<S: State, E: Event> Default for TransitionDraft<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> fmt::Debug for TransitionDraft<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionDraft")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("on", &self.on)
            .field("ignore", &self.ignore)
            .field("condition", &self.condition.is_some())
            .field("on_success", &self.on_success.is_some())
            .finish()
    }
}

/// A registered rule mapping `(on, from)` to a target state or to an
/// explicit no-op.
///
/// An ignored transition carries no target; [`Transition::is_ignored`] is
/// exactly `to().is_none()`.
pub struct Transition<S: State, E: Event> {
    from: S,
    to: Option<S>,
    on: E,
    condition: Option<SharedCondition>,
    on_success: Option<SharedSuccessListener<S, E>>,
}

impl<S: State, E: Event> Transition<S, E> {
    /// Origin state.
    pub fn from(&self) -> &S {
        &self.from
    }

    /// Target state, `None` for ignored transitions.
    pub fn to(&self) -> Option<&S> {
        self.to.as_ref()
    }

    /// Triggering event.
    pub fn on(&self) -> &E {
        &self.on
    }

    /// Whether firing this transition leaves the state unchanged.
    pub fn is_ignored(&self) -> bool {
        self.to.is_none()
    }

    /// Whether a guard is attached.
    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    /// Evaluate the guard. Transitions without one always pass.
    pub fn condition_met(&self) -> bool {
        self.condition.as_ref().is_none_or(|c| c.is_met())
    }

    pub(crate) fn notify_success(&self, from: &S, to: &S) {
        if let Some(listener) = &self.on_success {
            listener.on_success(from, to, &self.on);
        }
    }
}

impl<S: State, E: Event> fmt::Debug for Transition<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("on", &self.on)
            .field("ignore", &self.is_ignored())
            .field("condition", &self.condition.is_some())
            .field("on_success", &self.on_success.is_some())
            .finish()
    }
}
