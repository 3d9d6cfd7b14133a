//! Guard conditions and listener capabilities.
//!
//! A [`Condition`] is a zero-argument predicate evaluated every time its
//! transition is looked up by `fire`. Listeners are notified only after an
//! actual state change.

use std::sync::Arc;

/// Predicate that decides, at fire time, whether a transition may proceed.
///
/// Any `Fn() -> bool` closure is a condition.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Condition;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let paid = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&paid);
/// let condition = move || flag.load(Ordering::SeqCst);
///
/// assert!(!condition.is_met());
/// paid.store(true, Ordering::SeqCst);
/// assert!(condition.is_met());
/// ```
pub trait Condition: Send + Sync {
    /// Evaluate the guard. Called once per `fire` that reaches this transition.
    fn is_met(&self) -> bool;
}

impl<F> Condition for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_met(&self) -> bool {
        self()
    }
}

/// Callback attached to a single transition, invoked after it changes state.
pub trait SuccessListener<S, E>: Send + Sync {
    fn on_success(&self, from: &S, to: &S, on: &E);
}

impl<S, E, F> SuccessListener<S, E> for F
where
    F: Fn(&S, &S, &E) + Send + Sync,
{
    fn on_success(&self, from: &S, to: &S, on: &E) {
        self(from, to, on)
    }
}

/// Machine-wide observer, invoked after every state change.
pub trait StateChangeListener<S, E>: Send + Sync {
    fn on_state_changed(&self, from: &S, to: &S, on: &E);
}

impl<S, E, F> StateChangeListener<S, E> for F
where
    F: Fn(&S, &S, &E) + Send + Sync,
{
    fn on_state_changed(&self, from: &S, to: &S, on: &E) {
        self(from, to, on)
    }
}

/// Shared handle to a condition. Batches hand one guard to many transitions.
pub type SharedCondition = Arc<dyn Condition>;

/// Shared handle to a success listener.
pub type SharedSuccessListener<S, E> = Arc<dyn SuccessListener<S, E>>;
