//! Two-level transition table: event, then origin state.

use crate::core::{Event, State, Transition};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Transitions keyed by event and origin state.
///
/// Events keep their first-registration order for deterministic iteration.
/// At most one transition exists per `(event, from)` pair.
pub struct Registry<S: State, E: Event> {
    by_event: IndexMap<E, HashMap<S, Transition<S, E>>>,
}

impl<S: State, E: Event> Registry<S, E> {
    pub fn new() -> Self {
        Self {
            by_event: IndexMap::new(),
        }
    }

    /// Store a transition, returning the one it replaced, if any.
    pub(crate) fn insert(&mut self, transition: Transition<S, E>) -> Option<Transition<S, E>> {
        self.by_event
            .entry(transition.on().clone())
            .or_default()
            .insert(transition.from().clone(), transition)
    }

    /// Transition registered for `event` out of `from`.
    pub fn get(&self, event: &E, from: &S) -> Option<&Transition<S, E>> {
        self.by_event.get(event)?.get(from)
    }

    /// Whether `event` out of `from` has a transition.
    pub fn contains(&self, event: &E, from: &S) -> bool {
        self.get(event, from).is_some()
    }

    /// Whether any transition is registered for `event`.
    pub fn has_event(&self, event: &E) -> bool {
        self.by_event.contains_key(event)
    }

    /// All transitions triggered by `event`, in no particular order.
    pub fn transitions_for<'a>(
        &'a self,
        event: &E,
    ) -> impl Iterator<Item = &'a Transition<S, E>> + 'a {
        self.by_event
            .get(event)
            .into_iter()
            .flat_map(|by_state| by_state.values())
    }

    /// Registered events in first-registration order.
    pub fn events(&self) -> impl Iterator<Item = &E> {
        self.by_event.keys()
    }

    /// All transitions, grouped by event in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<S, E>> {
        self.by_event.values().flat_map(|by_state| by_state.values())
    }

    /// Total number of transitions.
    pub fn len(&self) -> usize {
        self.by_event.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_event.is_empty()
    }
}

impl<S: State, E: Event> Default for Registry<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> std::fmt::Debug for Registry<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.by_event.iter().map(|(event, by_state)| {
                (event, by_state.values().collect::<Vec<_>>())
            }))
            .finish()
    }
}
