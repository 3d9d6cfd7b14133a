//! Bounds for the caller-supplied state and event values.
//!
//! The engine treats states and events as opaque keys. They only need to be
//! comparable, hashable and printable, so both traits are blanket-implemented
//! for every type that meets those bounds.

use std::fmt::Debug;
use std::hash::Hash;

/// A state value of a state machine.
///
/// Implemented automatically for any `Clone + Eq + Hash + Debug` type.
///
/// # Example
///
/// ```rust
/// use statecraft::core::State;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum OrderState {
///     Created,
///     OnHold,
/// }
///
/// fn assert_state<S: State>(_: &S) {}
/// assert_state(&OrderState::Created);
/// ```
pub trait State: Clone + Eq + Hash + Debug + 'static {}

impl<T> State for T where T: Clone + Eq + Hash + Debug + 'static {}

/// An event value that may trigger a transition when fired.
///
/// Implemented automatically for any `Clone + Eq + Hash + Debug` type.
pub trait Event: Clone + Eq + Hash + Debug + 'static {}

impl<T> Event for T where T: Clone + Eq + Hash + Debug + 'static {}
