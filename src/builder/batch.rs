//! Bulk transition declarations.
//!
//! A batch takes three parallel sequences (origin states, target states,
//! events) and expands them into individual transitions. Sequences longer
//! than one are zipped elementwise and must agree on their length; a
//! sequence of length one is repeated against the others.
//!
//! | from_any | to_among | on_each | expands to                 |
//! |----------|----------|---------|----------------------------|
//! | `[A, B]` | `[B, C]` | `[X, Y]`| `A-X->B`, `B-Y->C`         |
//! | `[A, B]` | `[D]`    | `[X]`   | `A-X->D`, `B-X->D`         |
//! | `[A, B]` | ignored  | `[X]`   | `A-X` ignored, `B-X` ignored|
//! | `[A, B]` | `[B,C,D]`| `[X]`   | rejected (2 vs 3)          |
//! | `[A]`    | `[B, C]` | `[X]`   | rejected (one key, two targets)|
//! | `[A, A]` | `[B, C]` | `[X, X]`| `A-X->C` (last one wins)   |

use crate::builder::error::TransitionCreationError;
use crate::core::{
    Condition, Event, SharedCondition, SharedSuccessListener, State, TransitionDraft,
};
use crate::machine::StateMachine;
use std::sync::Arc;

/// A pending bulk declaration.
pub struct TransitionBatch<S: State, E: Event> {
    pub from_any: Vec<S>,
    pub to_among: Vec<S>,
    pub on_each: Vec<E>,
    pub ignore: bool,
    pub condition: Option<SharedCondition>,
    pub on_success: Option<SharedSuccessListener<S, E>>,
}

impl<S: State, E: Event> TransitionBatch<S, E> {
    pub fn new() -> Self {
        Self {
            from_any: Vec::new(),
            to_among: Vec::new(),
            on_each: Vec::new(),
            ignore: false,
            condition: None,
            on_success: None,
        }
    }

    /// Expand the batch into one draft per transition.
    ///
    /// Pure: performs every structural check up front and either returns
    /// the full list of drafts or an error, never a partial list.
    pub fn expand(&self) -> Result<Vec<TransitionDraft<S, E>>, TransitionCreationError> {
        if self.from_any.is_empty() {
            return Err(TransitionCreationError::MissingFromStates);
        }
        if self.on_each.is_empty() {
            return Err(TransitionCreationError::MissingEvents);
        }
        if !self.ignore && self.to_among.is_empty() {
            return Err(TransitionCreationError::MissingTargets);
        }

        let from_len = self.from_any.len();
        let on_len = self.on_each.len();
        let to_len = if self.ignore { 0 } else { self.to_among.len() };

        let length = broadcast_length(&[from_len, to_len, on_len]).ok_or(
            TransitionCreationError::AmbiguousLengths {
                from_any: from_len,
                to_among: to_len,
                on_each: on_len,
            },
        )?;

        if from_len == 1 && on_len == 1 && to_len > 1 {
            return Err(TransitionCreationError::AmbiguousFanOut {
                from: format!("{:?}", self.from_any[0]),
                on: format!("{:?}", self.on_each[0]),
                targets: to_len,
            });
        }

        let mut drafts = Vec::with_capacity(length);

        for i in 0..length {
            let from = &self.from_any[pick(i, from_len)];
            let on = &self.on_each[pick(i, on_len)];
            let to = (!self.ignore).then(|| self.to_among[pick(i, to_len)].clone());

            drafts.push(TransitionDraft {
                from: Some(from.clone()),
                to,
                on: Some(on.clone()),
                ignore: self.ignore,
                condition: self.condition.clone(),
                on_success: self.on_success.clone(),
            });
        }

        tracing::trace!(transitions = drafts.len(), "expanded transition batch");

        Ok(drafts)
    }
}

impl<S: State, E: Event> Default for TransitionBatch<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Common length of a set of broadcastable sequences.
///
/// Zero-length entries are treated as absent. Every length above one must
/// be the same; the result is that length, or one when all are singletons.
fn broadcast_length(lengths: &[usize]) -> Option<usize> {
    let mut common = 1;
    for &len in lengths.iter().filter(|&&len| len > 1) {
        if common > 1 && common != len {
            return None;
        }
        common = len;
    }
    Some(common)
}

/// Index into a sequence of `len` items for expansion step `i`.
fn pick(i: usize, len: usize) -> usize {
    if len > 1 {
        i
    } else {
        0
    }
}

/// Fluent builder for a [`TransitionBatch`], bound to its machine.
///
/// Obtained from [`StateMachine::transitions`].
pub struct TransitionBatchBuilder<'m, S: State, E: Event> {
    machine: &'m mut StateMachine<S, E>,
    batch: TransitionBatch<S, E>,
}

impl<'m, S: State, E: Event> TransitionBatchBuilder<'m, S, E> {
    pub(crate) fn new(machine: &'m mut StateMachine<S, E>) -> Self {
        Self {
            machine,
            batch: TransitionBatch::new(),
        }
    }

    pub fn from_any<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.batch.from_any = states.into_iter().collect();
        self
    }

    pub fn to_among<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.batch.to_among = states.into_iter().collect();
        self
    }

    pub fn on_each<I>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        self.batch.on_each = events.into_iter().collect();
        self
    }

    /// Expand into ignore rules. Any `to_among` states are disregarded.
    pub fn ignore(mut self) -> Self {
        self.batch.ignore = true;
        self
    }

    /// Guard shared by every expanded transition.
    pub fn when<C>(mut self, condition: C) -> Self
    where
        C: Condition + 'static,
    {
        self.batch.condition = Some(Arc::new(condition));
        self
    }

    /// Callback shared by every expanded transition.
    pub fn set_on_success_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&S, &S, &E) + Send + Sync + 'static,
    {
        self.batch.on_success = Some(Arc::new(listener));
        self
    }

    /// Expand, validate and register the whole batch, or nothing.
    pub fn create(self) -> Result<&'m mut StateMachine<S, E>, TransitionCreationError> {
        self.machine.apply_batch(self.batch)?;
        Ok(self.machine)
    }
}
