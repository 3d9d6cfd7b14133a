//! Statecraft: an embeddable finite state machine engine
//!
//! States and events are opaque caller-supplied values. Transitions are
//! declared through fluent builders bound to a machine, either one at a time
//! or in batches that broadcast parallel sequences of states and events.
//! Firing an event looks up the rule for the current state, evaluates its
//! guard and notifies listeners.
//!
//! # Core Concepts
//!
//! - **Transition**: `(from, on)` mapped to a target state or to an explicit no-op
//! - **Batch**: `from_any` / `to_among` / `on_each` sequences expanded with
//!   broadcast rules into many transitions, registered all-or-nothing
//! - **Condition**: a guard evaluated every time its transition is fired
//! - **Listeners**: a per-transition success callback and a machine-wide
//!   state change listener, both invoked only on actual state changes
//!
//! # Example
//!
//! ```rust
//! use statecraft::{FireError, StateMachine};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! enum Door { Open, Closed, Locked }
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! enum Action { Close, Lock, Open }
//!
//! let mut door = StateMachine::new(Door::Open);
//! door.transitions()
//!     .from_any([Door::Open, Door::Closed])
//!     .to_among([Door::Closed, Door::Locked])
//!     .on_each([Action::Close, Action::Lock])
//!     .create()?;
//!
//! door.fire(Action::Close)?;
//! door.fire(Action::Lock)?;
//! assert_eq!(door.current_state(), Some(&Door::Locked));
//!
//! assert!(matches!(
//!     door.fire(Action::Open),
//!     Err(FireError::NoTransitionForEvent { .. })
//! ));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod machine;
pub mod snapshot;

// Re-export commonly used types
pub use builder::{TransitionBatch, TransitionBuilder, TransitionCreationError};
pub use config::{DuplicatePolicy, MachineConfig};
pub use crate::core::{Condition, Event, State, Transition, TransitionHistory};
pub use machine::{FireError, FireOutcome, Registry, StateMachine};
pub use snapshot::{Snapshot, SnapshotError};
