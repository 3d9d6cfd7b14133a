//! Record of the state changes a machine has performed.
//!
//! Only actual changes are recorded. Ignored transitions, guard rejections
//! and lookup failures leave the history untouched.

use super::state::{Event, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One state change caused by firing an event.
///
/// # Example
///
/// ```rust
/// use statecraft::core::FiredTransition;
/// use chrono::Utc;
///
/// let fired = FiredTransition {
///     from: "created",
///     to: "on_hold",
///     on: "hold",
///     timestamp: Utc::now(),
/// };
/// assert_eq!(fired.to, "on_hold");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiredTransition<S, E> {
    pub from: S,
    pub to: S,
    pub on: E,
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of fired transitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionHistory<S, E> {
    transitions: Vec<FiredTransition<S, E>>,
}

impl<S, E> Default for TransitionHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E> TransitionHistory<S, E> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    pub fn push(&mut self, transition: FiredTransition<S, E>) {
        self.transitions.push(transition);
    }

    /// States traversed, in order: the first origin, then every target.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statecraft::core::{FiredTransition, TransitionHistory};
    /// use chrono::Utc;
    ///
    /// let mut history = TransitionHistory::new();
    /// history.push(FiredTransition { from: 'a', to: 'b', on: 1, timestamp: Utc::now() });
    /// history.push(FiredTransition { from: 'b', to: 'c', on: 2, timestamp: Utc::now() });
    ///
    /// assert_eq!(history.path(), vec![&'a', &'b', &'c']);
    /// ```
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and the last recorded change.
    ///
    /// Returns `None` when nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[FiredTransition<S, E>] {
        &self.transitions
    }

    pub fn last(&self) -> Option<&FiredTransition<S, E>> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

impl<S: State, E: Event> TransitionHistory<S, E> {
    /// Number of recorded changes triggered by `event`.
    pub fn count_for(&self, event: &E) -> usize {
        self.transitions.iter().filter(|t| &t.on == event).count()
    }
}
