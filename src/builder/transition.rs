//! Fluent builder for a single transition.

use crate::builder::error::TransitionCreationError;
use crate::core::{Condition, Event, State, TransitionDraft};
use crate::machine::StateMachine;
use std::sync::Arc;

/// Builder for one transition, bound to the machine it registers into.
///
/// Obtained from [`StateMachine::transition`]. Nothing is validated until
/// [`create`](TransitionBuilder::create), which hands the collected draft to
/// [`StateMachine::apply`].
pub struct TransitionBuilder<'m, S: State, E: Event> {
    machine: &'m mut StateMachine<S, E>,
    draft: TransitionDraft<S, E>,
}

impl<'m, S: State, E: Event> TransitionBuilder<'m, S, E> {
    pub(crate) fn new(machine: &'m mut StateMachine<S, E>) -> Self {
        Self {
            machine,
            draft: TransitionDraft::new(),
        }
    }

    /// Set the origin state (required).
    pub fn from(mut self, state: S) -> Self {
        self.draft.from = Some(state);
        self
    }

    /// Set the target state. Required unless [`ignore`](Self::ignore) is called.
    pub fn to(mut self, state: S) -> Self {
        self.draft.to = Some(state);
        self
    }

    /// Set the triggering event (required).
    pub fn on(mut self, event: E) -> Self {
        self.draft.on = Some(event);
        self
    }

    /// Make this transition an explicit no-op.
    pub fn ignore(mut self) -> Self {
        self.draft.ignore = true;
        self
    }

    /// Guard the transition with a condition evaluated at fire time.
    pub fn when<C>(mut self, condition: C) -> Self
    where
        C: Condition + 'static,
    {
        self.draft.condition = Some(Arc::new(condition));
        self
    }

    /// Callback invoked after this transition changes state.
    pub fn set_on_success_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&S, &S, &E) + Send + Sync + 'static,
    {
        self.draft.on_success = Some(Arc::new(listener));
        self
    }

    /// Validate and register the transition, returning the machine for
    /// further chaining.
    pub fn create(self) -> Result<&'m mut StateMachine<S, E>, TransitionCreationError> {
        self.machine.apply(self.draft)?;
        Ok(self.machine)
    }
}
