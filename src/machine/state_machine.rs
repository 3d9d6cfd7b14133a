//! State machine owning the transition table and dispatching events.

use crate::builder::{
    TransitionBatch, TransitionBatchBuilder, TransitionBuilder, TransitionCreationError,
};
use crate::config::{DuplicatePolicy, MachineConfig};
use crate::core::{
    Event, FiredTransition, State, StateChangeListener, Transition, TransitionDraft,
    TransitionHistory,
};
use crate::machine::error::FireError;
use crate::machine::registry::Registry;
use crate::snapshot::{Snapshot, SnapshotError};
use chrono::Utc;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Result of a successful `fire`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FireOutcome<S> {
    /// State changed and listeners were notified
    Transitioned { from: S, to: S },

    /// Matching rule was an ignore rule; nothing changed
    Ignored { state: S },
}

impl<S> FireOutcome<S> {
    /// State the machine is in after the fire.
    pub fn state(&self) -> &S {
        match self {
            Self::Transitioned { to, .. } => to,
            Self::Ignored { state } => state,
        }
    }

    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

type BoxedStateChangeListener<S, E> = Box<dyn StateChangeListener<S, E>>;

/// Finite state machine over caller-supplied state and event values.
///
/// # Example
///
/// ```rust
/// use statecraft::StateMachine;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Order { Created, OnHold, Delivered }
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Action { Hold, Deliver, Cancel }
///
/// let mut machine = StateMachine::new(Order::Created);
/// machine
///     .transition().from(Order::Created).to(Order::OnHold).on(Action::Hold).create()?
///     .transition().from(Order::OnHold).to(Order::Delivered).on(Action::Deliver).create()?
///     .transition().from(Order::Delivered).on(Action::Cancel).ignore().create()?;
///
/// machine.fire(Action::Hold)?;
/// machine.fire(Action::Deliver)?;
/// machine.fire(Action::Cancel)?;
///
/// assert_eq!(machine.current_state(), Some(&Order::Delivered));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StateMachine<S: State, E: Event> {
    current: Option<S>,
    registry: Registry<S, E>,
    listener: Option<BoxedStateChangeListener<S, E>>,
    config: MachineConfig,
    history: TransitionHistory<S, E>,
}

impl<S: State, E: Event> StateMachine<S, E> {
    /// Create a machine in `initial` with the default configuration.
    pub fn new(initial: S) -> Self {
        Self::with_config(initial, MachineConfig::default())
    }

    /// Create a machine in `initial` with an explicit configuration.
    pub fn with_config(initial: S, config: MachineConfig) -> Self {
        Self {
            current: Some(initial),
            registry: Registry::new(),
            listener: None,
            config,
            history: TransitionHistory::new(),
        }
    }

    /// State the next `fire` starts from, if one is set.
    pub fn current_state(&self) -> Option<&S> {
        self.current.as_ref()
    }

    /// Re-home the machine without firing anything. No listener is invoked.
    pub fn set_current_state(&mut self, state: S) {
        self.current = Some(state);
    }

    /// Configuration the machine was built with.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Every registered transition, keyed by event then origin state.
    pub fn registry(&self) -> &Registry<S, E> {
        &self.registry
    }

    /// History of state changes. Empty unless `record_history` is enabled.
    pub fn history(&self) -> &TransitionHistory<S, E> {
        &self.history
    }

    /// Observe every state change. Replaces any previous listener.
    pub fn set_state_change_listener<F>(&mut self, listener: F)
    where
        F: Fn(&S, &S, &E) + Send + Sync + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_state_change_listener(&mut self) {
        self.listener = None;
    }

    pub fn has_state_change_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Start declaring a single transition.
    pub fn transition(&mut self) -> TransitionBuilder<'_, S, E> {
        TransitionBuilder::new(self)
    }

    /// Start declaring a batch of transitions.
    pub fn transitions(&mut self) -> TransitionBatchBuilder<'_, S, E> {
        TransitionBatchBuilder::new(self)
    }

    /// Validate a draft and store it in the registry.
    ///
    /// Under [`DuplicatePolicy::Replace`] an existing rule for the same
    /// `(event, from)` pair is replaced; under [`DuplicatePolicy::Reject`] the
    /// call fails and the existing rule is kept.
    pub fn apply(&mut self, draft: TransitionDraft<S, E>) -> Result<(), TransitionCreationError> {
        let transition = draft.validate()?;
        self.check_duplicate(&transition)?;
        self.register(transition);
        Ok(())
    }

    /// Expand, validate and store a batch. Either every expanded transition
    /// is registered or none is.
    pub fn apply_batch(
        &mut self,
        batch: TransitionBatch<S, E>,
    ) -> Result<(), TransitionCreationError> {
        let transitions = batch
            .expand()?
            .into_iter()
            .map(TransitionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;

        let mut keys = HashSet::with_capacity(transitions.len());
        for transition in &transitions {
            self.check_duplicate(transition)?;
            if self.config.duplicate_policy == DuplicatePolicy::Reject
                && !keys.insert((transition.on(), transition.from()))
            {
                return Err(TransitionCreationError::DuplicateTransition {
                    from: format!("{:?}", transition.from()),
                    on: format!("{:?}", transition.on()),
                });
            }
        }

        debug!(count = transitions.len(), "registering transition batch");
        for transition in transitions {
            self.register(transition);
        }
        Ok(())
    }

    fn check_duplicate(&self, transition: &Transition<S, E>) -> Result<(), TransitionCreationError> {
        if self.config.duplicate_policy == DuplicatePolicy::Reject
            && self.registry.contains(transition.on(), transition.from())
        {
            return Err(TransitionCreationError::DuplicateTransition {
                from: format!("{:?}", transition.from()),
                on: format!("{:?}", transition.on()),
            });
        }
        Ok(())
    }

    fn register(&mut self, transition: Transition<S, E>) {
        debug!(?transition, "registering transition");
        if let Some(previous) = self.registry.insert(transition) {
            debug!(?previous, "replaced existing transition");
        }
    }

    /// Find the rule `fire(event)` would use, without evaluating it.
    fn lookup<'c, 'r>(
        current: Option<&'c S>,
        registry: &'r Registry<S, E>,
        event: &E,
    ) -> Result<(&'c S, &'r Transition<S, E>), FireError> {
        let current = current.ok_or(FireError::InvalidState)?;

        if registry.is_empty() {
            return Err(FireError::NoTransitionsDefined);
        }
        if !registry.has_event(event) {
            return Err(FireError::NoTransitionForEvent {
                event: format!("{event:?}"),
            });
        }

        let transition =
            registry
                .get(event, current)
                .ok_or_else(|| FireError::NoTransitionFromState {
                    state: format!("{current:?}"),
                    event: format!("{event:?}"),
                })?;

        Ok((current, transition))
    }

    /// Whether a rule exists for `event` in the current state.
    ///
    /// Guards are not evaluated.
    pub fn can_fire(&self, event: &E) -> bool {
        Self::lookup(self.current.as_ref(), &self.registry, event).is_ok()
    }

    /// Fire `event` from the current state.
    ///
    /// On a state change the transition's success listener runs first, then
    /// the machine's state change listener. Ignored transitions and errors
    /// leave the state untouched and notify nobody.
    pub fn fire(&mut self, event: E) -> Result<FireOutcome<S>, FireError> {
        let (current, transition) = Self::lookup(self.current.as_ref(), &self.registry, &event)?;
        debug!(?transition, "event accepted");

        let Some(to) = transition.to() else {
            debug!(state = ?current, on = ?event, "transition ignored");
            return Ok(FireOutcome::Ignored {
                state: current.clone(),
            });
        };

        if !transition.condition_met() {
            debug!(from = ?current, to = ?to, on = ?event, "condition not met");
            return Err(FireError::ConditionNotMet {
                from: format!("{current:?}"),
                to: format!("{to:?}"),
                on: format!("{event:?}"),
            });
        }

        let from = current.clone();
        let to = to.clone();
        self.current = Some(to.clone());

        transition.notify_success(&from, &to);
        if let Some(listener) = &self.listener {
            listener.on_state_changed(&from, &to, &event);
        }

        if self.config.record_history {
            self.history.push(FiredTransition {
                from: from.clone(),
                to: to.clone(),
                on: event,
                timestamp: Utc::now(),
            });
        }

        Ok(FireOutcome::Transitioned { from, to })
    }

    /// Set the current state to `state`, then fire `event`.
    ///
    /// The new current state sticks even when the fire fails.
    pub fn fire_from(&mut self, event: E, state: S) -> Result<FireOutcome<S>, FireError> {
        self.current = Some(state);
        self.fire(event)
    }

    /// Capture the current state and history.
    pub fn snapshot(&self) -> Snapshot<S, E> {
        Snapshot::new(self.current.clone(), self.history.clone())
    }

    /// Restore state and history from a snapshot. Registered transitions and
    /// listeners are kept as they are.
    pub fn restore(&mut self, snapshot: Snapshot<S, E>) -> Result<(), SnapshotError> {
        snapshot.check_version()?;
        self.current = snapshot.current_state;
        self.history = snapshot.history;
        Ok(())
    }
}

impl<S: State, E: Event> Default for StateMachine<S, E> {
    /// A machine without a current state. `fire` fails with
    /// [`FireError::InvalidState`] until one is set.
    fn default() -> Self {
        Self {
            current: None,
            registry: Registry::new(),
            listener: None,
            config: MachineConfig::default(),
            history: TransitionHistory::new(),
        }
    }
}

impl<S: State, E: Event> fmt::Debug for StateMachine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("registry", &self.registry)
            .field("listener", &self.listener.is_some())
            .field("config", &self.config)
            .field("history", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum OrderState {
        Created,
        OnHold,
        Delivered,
        Cancelled,
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum OrderEvent {
        Create,
        Hold,
        Deliver,
        Cancel,
    }

    use OrderEvent::*;
    use OrderState::*;

    fn order_machine() -> StateMachine<OrderState, OrderEvent> {
        let mut machine = StateMachine::new(Created);
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .create()
            .unwrap()
            .transition()
            .from(OnHold)
            .to(Delivered)
            .on(Deliver)
            .create()
            .unwrap()
            .transition()
            .from(Delivered)
            .on(Cancel)
            .ignore()
            .create()
            .unwrap();
        machine
    }

    #[test]
    fn fire_follows_registered_transitions() {
        let mut machine = order_machine();

        let outcome = machine.fire(Hold).unwrap();
        assert_eq!(
            outcome,
            FireOutcome::Transitioned {
                from: Created,
                to: OnHold
            }
        );
        assert_eq!(machine.current_state(), Some(&OnHold));
    }

    #[test]
    fn cancel_after_delivery_is_ignored() {
        let mut machine = order_machine();

        machine.fire(Hold).unwrap();
        machine.fire(Deliver).unwrap();
        let outcome = machine.fire(Cancel).unwrap();

        assert_eq!(outcome, FireOutcome::Ignored { state: Delivered });
        assert!(!outcome.is_transitioned());
        assert_eq!(outcome.state(), &Delivered);
        assert_eq!(machine.current_state(), Some(&Delivered));
    }

    #[test]
    fn unknown_from_state_is_reported() {
        let mut machine = order_machine();

        let err = machine.fire(Deliver).unwrap_err();

        assert!(matches!(err, FireError::NoTransitionFromState { .. }));
        assert!(!err.is_condition_not_met());
        assert_eq!(machine.current_state(), Some(&Created));
    }

    #[test]
    fn unknown_event_is_reported() {
        let mut machine = order_machine();

        let err = machine.fire(Create).unwrap_err();

        assert_eq!(
            err,
            FireError::NoTransitionForEvent {
                event: "Create".to_string()
            }
        );
    }

    #[test]
    fn empty_machine_has_no_transitions() {
        let mut machine: StateMachine<OrderState, OrderEvent> = StateMachine::new(Created);

        assert_eq!(machine.fire(Hold), Err(FireError::NoTransitionsDefined));
    }

    #[test]
    fn machine_without_state_is_invalid() {
        let mut machine: StateMachine<OrderState, OrderEvent> = StateMachine::default();
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .create()
            .unwrap();

        assert_eq!(machine.current_state(), None);
        assert_eq!(machine.fire(Hold), Err(FireError::InvalidState));

        machine.set_current_state(Created);
        assert!(machine.fire(Hold).is_ok());
    }

    #[test]
    fn failed_condition_keeps_state() {
        let mut machine = StateMachine::new(Created);
        let (a, b) = (2, 3);
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .when(move || a == b)
            .create()
            .unwrap();

        let err = machine.fire(Hold).unwrap_err();

        assert!(err.is_condition_not_met());
        assert_eq!(machine.current_state(), Some(&Created));
    }

    #[test]
    fn met_condition_allows_transition() {
        let mut machine = StateMachine::new(Created);
        let (a, b) = (2, 2);
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .when(move || a == b)
            .create()
            .unwrap();

        machine.fire(Hold).unwrap();

        assert_eq!(machine.current_state(), Some(&OnHold));
    }

    #[test]
    fn listeners_run_in_order_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let mut machine = StateMachine::new(Created);
        let success_calls = Arc::clone(&calls);
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .set_on_success_listener(move |from, to, on| {
                success_calls
                    .lock()
                    .unwrap()
                    .push(("success", *from, *to, *on));
            })
            .create()
            .unwrap();

        let changed_calls = Arc::clone(&calls);
        machine.set_state_change_listener(move |from, to, on| {
            changed_calls
                .lock()
                .unwrap()
                .push(("changed", *from, *to, *on));
        });

        machine.fire(Hold).unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                ("success", Created, OnHold, Hold),
                ("changed", Created, OnHold, Hold)
            ]
        );
    }

    #[test]
    fn listeners_are_silent_on_ignore_and_rejection() {
        let calls = Arc::new(AtomicUsize::new(0));

        let mut machine = StateMachine::new(Created);
        let on_success = Arc::clone(&calls);
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .when(|| false)
            .set_on_success_listener(move |_, _, _| {
                on_success.fetch_add(1, Ordering::SeqCst);
            })
            .create()
            .unwrap()
            .transition()
            .from(Created)
            .on(Cancel)
            .ignore()
            .create()
            .unwrap();

        let on_change = Arc::clone(&calls);
        machine.set_state_change_listener(move |_, _, _| {
            on_change.fetch_add(1, Ordering::SeqCst);
        });

        assert!(machine.fire(Hold).is_err());
        assert!(machine.fire(Cancel).is_ok());

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(machine.current_state(), Some(&Created));
    }

    #[test]
    fn cleared_listener_is_not_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut machine = order_machine();
        let counter = Arc::clone(&calls);
        machine.set_state_change_listener(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(machine.has_state_change_listener());

        machine.clear_state_change_listener();
        machine.fire(Hold).unwrap();

        assert!(!machine.has_state_change_listener());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fire_from_overrides_current_state() {
        let mut machine = order_machine();

        machine.fire_from(Deliver, OnHold).unwrap();

        assert_eq!(machine.current_state(), Some(&Delivered));
    }

    #[test]
    fn fire_from_keeps_override_on_failure() {
        let mut machine = order_machine();

        assert!(machine.fire_from(Hold, Cancelled).is_err());

        assert_eq!(machine.current_state(), Some(&Cancelled));
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut machine = StateMachine::new(Created);
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .create()
            .unwrap()
            .transition()
            .from(Created)
            .to(Cancelled)
            .on(Hold)
            .create()
            .unwrap();

        machine.fire(Hold).unwrap();

        assert_eq!(machine.current_state(), Some(&Cancelled));
        assert_eq!(machine.registry().len(), 1);
    }

    #[test]
    fn reject_policy_keeps_first_registration() {
        let config = MachineConfig::default().duplicate_policy(DuplicatePolicy::Reject);
        let mut machine = StateMachine::with_config(Created, config);
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .create()
            .unwrap();

        let err = machine
            .transition()
            .from(Created)
            .to(Cancelled)
            .on(Hold)
            .create()
            .unwrap_err();

        assert!(matches!(
            err,
            TransitionCreationError::DuplicateTransition { .. }
        ));
        machine.fire(Hold).unwrap();
        assert_eq!(machine.current_state(), Some(&OnHold));
    }

    #[test]
    fn reject_policy_rejects_whole_batch() {
        let config = MachineConfig::default().duplicate_policy(DuplicatePolicy::Reject);
        let mut machine = StateMachine::with_config(Created, config);
        machine
            .transition()
            .from(OnHold)
            .to(Delivered)
            .on(Deliver)
            .create()
            .unwrap();

        let result = machine
            .transitions()
            .from_any([Created, OnHold])
            .to_among([Delivered])
            .on_each([Deliver])
            .create();

        assert!(result.is_err());
        assert_eq!(machine.registry().len(), 1);
        assert!(!machine.can_fire(&Deliver));
    }

    #[test]
    fn reject_policy_rejects_key_repeated_within_batch() {
        let config = MachineConfig::default().duplicate_policy(DuplicatePolicy::Reject);
        let mut machine = StateMachine::with_config(Created, config);

        let err = machine
            .transitions()
            .from_any([Created, Created])
            .to_among([OnHold, Delivered])
            .on_each([Hold, Hold])
            .create()
            .unwrap_err();

        assert!(matches!(
            err,
            TransitionCreationError::DuplicateTransition { .. }
        ));
        assert!(machine.registry().is_empty());
    }

    #[test]
    fn replace_policy_keeps_last_repeated_key_in_batch() {
        let mut machine = StateMachine::new(Created);

        machine
            .transitions()
            .from_any([Created, Created])
            .to_among([OnHold, Delivered])
            .on_each([Hold, Hold])
            .create()
            .unwrap();

        assert_eq!(machine.registry().len(), 1);
        assert_eq!(
            machine.fire(Hold),
            Ok(FireOutcome::Transitioned {
                from: Created,
                to: Delivered
            })
        );
    }

    #[test]
    fn can_fire_reports_lookup_only() {
        let mut machine = StateMachine::new(Created);
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .when(|| false)
            .create()
            .unwrap();

        assert!(machine.can_fire(&Hold));
        assert!(!machine.can_fire(&Deliver));
    }

    #[test]
    fn history_records_only_state_changes() {
        let config = MachineConfig::default().record_history(true);
        let mut machine = StateMachine::with_config(Created, config);
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .create()
            .unwrap()
            .transition()
            .from(OnHold)
            .on(Cancel)
            .ignore()
            .create()
            .unwrap();

        machine.fire(Hold).unwrap();
        machine.fire(Cancel).unwrap();
        let _ = machine.fire(Deliver);

        assert_eq!(machine.history().len(), 1);
        assert_eq!(machine.history().path(), vec![&Created, &OnHold]);
    }

    #[test]
    fn history_is_off_by_default() {
        let mut machine = order_machine();
        machine.fire(Hold).unwrap();
        assert!(machine.history().is_empty());
    }

    #[test]
    fn restore_rehomes_machine() {
        let config = MachineConfig::default().record_history(true);
        let mut machine = StateMachine::with_config(Created, config);
        machine
            .transition()
            .from(Created)
            .to(OnHold)
            .on(Hold)
            .create()
            .unwrap();
        machine.fire(Hold).unwrap();
        let snapshot = machine.snapshot();

        let mut fresh = order_machine();
        fresh.restore(snapshot).unwrap();

        assert_eq!(fresh.current_state(), Some(&OnHold));
        assert_eq!(fresh.history().len(), 1);
        fresh.fire(Deliver).unwrap();
        assert_eq!(fresh.current_state(), Some(&Delivered));
    }

    #[test]
    fn machine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StateMachine<OrderState, OrderEvent>>();
    }
}
