//! The base engine shared by every machine variant.

use crate::core::{FsmError, HookError, HookKind, State, StateId};
use crate::machine::MachineKind;
use std::fmt::Debug;
use uuid::Uuid;

/// Generic finite state machine (a semiautomaton).
///
/// Owns its states, the initial state and the current-state cursor.
/// Acceptors and transducers wrap this engine and reuse its transition
/// algorithm.
///
/// # Example
///
/// ```rust
/// use automata::core::State;
/// use automata::machine::FiniteStateMachine;
///
/// let mut door = FiniteStateMachine::<&str>::new("door");
/// let closed = door.add_state(State::new("Closed").initial()).unwrap();
/// let open = door.add_state(State::new("Open")).unwrap();
/// door.set_transition(closed, "push", open).unwrap();
/// door.set_transition(open, "pull", closed).unwrap();
///
/// door.process(["push", "pull", "push"]).unwrap();
/// assert_eq!(door.current_state(), Some(open));
/// ```
pub struct FiniteStateMachine<I, O = ()> {
    id: Uuid,
    name: String,
    kind: MachineKind,
    states: Vec<State<I, O>>,
    init_state: Option<StateId>,
    current_state: Option<StateId>,
    accepting_states: Vec<StateId>,
}

impl<I, O> FiniteStateMachine<I, O> {
    /// Create an empty semiautomaton.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, MachineKind::Semiautomaton)
    }

    pub(crate) fn with_kind(name: impl Into<String>, kind: MachineKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            states: Vec::new(),
            init_state: None,
            current_state: None,
            accepting_states: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MachineKind {
        self.kind
    }

    /// Attach a state to this machine.
    ///
    /// An `initial` state becomes the machine's initial state, replacing any
    /// earlier one. An `accepting` state fails with
    /// [`FsmError::StateCapability`] unless the machine is an acceptor.
    pub fn add_state(&mut self, state: State<I, O>) -> Result<StateId, FsmError> {
        if state.is_accepting() && !self.kind.supports_accepting() {
            return Err(FsmError::StateCapability {
                machine: self.name.clone(),
                kind: self.kind.to_string(),
            });
        }
        if let Some(target) = state.default_transition() {
            self.check_default_target(target)?;
        }

        let id = StateId::new(self.id, self.states.len());
        tracing::trace!(machine = %self.name, state = state.name(), %id, "attaching state");

        if state.is_accepting() {
            self.accepting_states.push(id);
        }
        if state.is_initial() {
            if let Some(previous) = self.init_state {
                tracing::warn!(
                    machine = %self.name,
                    previous = self.states[previous.index()].name(),
                    replacement = state.name(),
                    "initial state replaced"
                );
            }
            self.init_state = Some(id);
        }
        self.states.push(state);
        Ok(id)
    }

    /// Set or replace the "else" transition of `from`.
    pub fn set_default_transition(&mut self, from: StateId, to: StateId) -> Result<(), FsmError> {
        self.check(from)?;
        self.check(to)?;
        self.states[from.index()].set_default_transition(to);
        Ok(())
    }

    /// Look up a state by handle.
    pub fn state(&self, id: StateId) -> Option<&State<I, O>> {
        if id.machine() != self.id {
            return None;
        }
        self.states.get(id.index())
    }

    /// Handles of all states, in attachment order.
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len()).map(|index| StateId::new(self.id, index))
    }

    /// All states, in attachment order.
    pub fn states(&self) -> &[State<I, O>] {
        &self.states
    }

    pub fn init_state(&self) -> Option<StateId> {
        self.init_state
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.current_state
    }

    /// Accepting states of an acceptor; empty for other kinds.
    pub fn accepting_states(&self) -> &[StateId] {
        &self.accepting_states
    }

    /// Whether `id` belongs to the accepting set.
    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepting_states.contains(&id)
    }

    /// Every `(source, input, destination)` triple, ordered by state list
    /// and then by registration order within each state.
    pub fn all_transitions(&self) -> impl Iterator<Item = (StateId, &I, StateId)> + '_ {
        self.states.iter().enumerate().flat_map(move |(index, state)| {
            let source = StateId::new(self.id, index);
            state
                .transitions()
                .map(move |(input, dest)| (source, input, dest))
        })
    }

    /// Move the cursor back to the initial state.
    pub fn reset(&mut self) {
        self.current_state = self.init_state;
        tracing::debug!(machine = %self.name, state = ?self.current_state, "reset");
    }

    pub(crate) fn current_state_ref(&self) -> Result<&State<I, O>, FsmError> {
        let current = self.current_state.ok_or_else(|| FsmError::TransitionNotSet {
            machine: self.name.clone(),
        })?;
        Ok(&self.states[current.index()])
    }

    fn check(&self, id: StateId) -> Result<(), FsmError> {
        if id.machine() != self.id || id.index() >= self.states.len() {
            return Err(FsmError::configuration(format!(
                "state {id} does not belong to machine '{}'",
                self.name
            )));
        }
        Ok(())
    }

    fn check_default_target(&self, target: StateId) -> Result<(), FsmError> {
        self.check(target).map_err(|_| {
            FsmError::configuration(format!(
                "default transition target {target} does not belong to machine '{}'",
                self.name
            ))
        })
    }

    /// Fire `from.on_input`, `from.on_exit`, `from.on_transition` and
    /// `to.on_entry`, stopping at the first failure.
    fn fire_hooks(&mut self, from: StateId, input: &I, to: StateId) -> Result<(), FsmError> {
        let to_name = self.states[to.index()].name().to_owned();
        let source = &mut self.states[from.index()];
        tracing::trace!(state = source.name(), next = %to_name, "firing hooks");

        let from_name = source.name().to_owned();
        source
            .hooks
            .fire_input(input)
            .map_err(|e| hook_failed(&from_name, HookKind::Input, e))?;
        source
            .hooks
            .fire_exit()
            .map_err(|e| hook_failed(&from_name, HookKind::Exit, e))?;
        source
            .hooks
            .fire_transition(to, &to_name)
            .map_err(|e| hook_failed(&from_name, HookKind::Transition, e))?;

        self.states[to.index()]
            .hooks
            .fire_entry()
            .map_err(|e| hook_failed(&to_name, HookKind::Entry, e))
    }
}

fn hook_failed(state: &str, hook: HookKind, source: HookError) -> FsmError {
    FsmError::Hook {
        state: state.to_owned(),
        hook,
        source,
    }
}

impl<I: PartialEq + Debug, O> FiniteStateMachine<I, O> {
    /// Register `to` as the state reached from `from` on `input`.
    ///
    /// Fails with [`FsmError::Configuration`] if either handle does not
    /// belong to this machine.
    pub fn set_transition(&mut self, from: StateId, input: I, to: StateId) -> Result<(), FsmError> {
        self.check(from)?;
        self.check(to)?;
        self.states[from.index()].insert_transition(input, to);
        Ok(())
    }

    /// Register a transition together with a Mealy-style output.
    ///
    /// The output is appended to the source state's output values without
    /// deduplication; lookups see the latest registration for an input.
    pub fn set_transition_with_output(
        &mut self,
        from: StateId,
        input: I,
        output: O,
        to: StateId,
    ) -> Result<(), FsmError>
    where
        I: Clone,
    {
        self.check(from)?;
        self.check(to)?;
        let state = &mut self.states[from.index()];
        state.push_output(input.clone(), output);
        state.insert_transition(input, to);
        Ok(())
    }

    /// Follow the exact transition for `input` out of `from`, firing hooks.
    ///
    /// This is not a pure lookup: `on_input`, `on_exit`, `on_transition` of
    /// the source and `on_entry` of the destination run before the
    /// destination is returned. The current state is left untouched.
    /// Default transitions are not consulted; a miss is
    /// [`FsmError::NoTransition`].
    pub fn step_to(&mut self, from: StateId, input: &I) -> Result<StateId, FsmError> {
        self.check(from)?;
        let state = &self.states[from.index()];
        let dest = state
            .destination(input)
            .ok_or_else(|| FsmError::NoTransition {
                state: state.name().to_owned(),
                input: format!("{input:?}"),
            })?;
        self.fire_hooks(from, input, dest)?;
        Ok(dest)
    }

    /// Advance the current state on `input`.
    ///
    /// Uses the exact transition if one exists, otherwise the current
    /// state's default transition. Hooks fire for either. On any error the
    /// current state is unchanged.
    pub fn transition(&mut self, input: &I) -> Result<StateId, FsmError> {
        let current = self.current_state.ok_or_else(|| FsmError::TransitionNotSet {
            machine: self.name.clone(),
        })?;
        let state = &self.states[current.index()];
        let dest = state
            .destination(input)
            .or(state.default_transition())
            .ok_or_else(|| FsmError::TransitionUndefined {
                state: state.name().to_owned(),
                input: format!("{input:?}"),
            })?;

        self.fire_hooks(current, input, dest)?;
        self.current_state = Some(dest);
        tracing::debug!(
            machine = %self.name,
            from = self.states[current.index()].name(),
            to = self.states[dest.index()].name(),
            ?input,
            "transition"
        );
        Ok(dest)
    }

    /// Reset, then transition once per input in order.
    ///
    /// The first failing input aborts processing; states reached before it
    /// are not rolled back.
    pub fn process<T>(&mut self, inputs: T) -> Result<(), FsmError>
    where
        T: IntoIterator<Item = I>,
    {
        self.reset();
        for input in inputs {
            self.transition(&input)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn door() -> (FiniteStateMachine<&'static str>, StateId, StateId) {
        let mut machine = FiniteStateMachine::new("door");
        let closed = machine.add_state(State::new("Closed").initial()).unwrap();
        let open = machine.add_state(State::new("Open")).unwrap();
        machine.set_transition(closed, "push", open).unwrap();
        machine.set_transition(open, "pull", closed).unwrap();
        (machine, closed, open)
    }

    #[test]
    fn new_machine_is_uninitialized() {
        let machine = FiniteStateMachine::<char>::new("empty");

        assert_eq!(machine.name(), "empty");
        assert_eq!(machine.kind(), MachineKind::Semiautomaton);
        assert!(machine.states().is_empty());
        assert!(machine.init_state().is_none());
        assert!(machine.current_state().is_none());
    }

    #[test]
    fn reset_moves_to_initial_state() {
        let (mut machine, closed, _) = door();

        machine.reset();

        assert_eq!(machine.current_state(), Some(closed));
    }

    #[test]
    fn transition_without_reset_fails() {
        let (mut machine, _, _) = door();

        let result = machine.transition(&"push");

        assert!(matches!(result, Err(FsmError::TransitionNotSet { .. })));
        assert!(machine.current_state().is_none());
    }

    #[test]
    fn reset_without_initial_state_leaves_cursor_empty() {
        let mut machine = FiniteStateMachine::<char>::new("no_init");
        machine.add_state(State::new("A")).unwrap();

        machine.reset();

        assert!(machine.current_state().is_none());
        assert!(matches!(
            machine.transition(&'a'),
            Err(FsmError::TransitionNotSet { .. })
        ));
    }

    #[test]
    fn undefined_transition_keeps_current_state() {
        let (mut machine, closed, _) = door();
        machine.reset();

        let err = machine.transition(&"kick").unwrap_err();

        assert!(matches!(err, FsmError::TransitionUndefined { .. }));
        assert_eq!(
            err.to_string(),
            "cannot transition from state 'Closed' on input \"kick\""
        );
        assert_eq!(machine.current_state(), Some(closed));
    }

    #[test]
    fn default_transition_is_used_on_miss() {
        let mut machine = FiniteStateMachine::<char>::new("else");
        let sink = machine.add_state(State::new("Sink")).unwrap();
        let start = machine
            .add_state(State::new("Start").initial().default_to(sink))
            .unwrap();
        machine.set_transition(start, 'a', start).unwrap();

        machine.process(['a', 'a']).unwrap();
        assert_eq!(machine.current_state(), Some(start));

        machine.process(['a', 'z']).unwrap();
        assert_eq!(machine.current_state(), Some(sink));
    }

    #[test]
    fn process_stops_at_first_failure_without_rollback() {
        let (mut machine, _, open) = door();

        let result = machine.process(["push", "push", "pull"]);

        assert!(result.is_err());
        assert_eq!(machine.current_state(), Some(open));
    }

    #[test]
    fn last_initial_state_wins() {
        let mut machine = FiniteStateMachine::<char>::new("two_initials");
        machine.add_state(State::new("First").initial()).unwrap();
        let second = machine.add_state(State::new("Second").initial()).unwrap();

        assert_eq!(machine.init_state(), Some(second));
    }

    #[test]
    fn accepting_state_rejected_by_semiautomaton() {
        let mut machine = FiniteStateMachine::<char>::new("plain");

        let err = machine
            .add_state(State::new("Done").accepting())
            .unwrap_err();

        assert!(matches!(
            err,
            FsmError::StateCapability { ref machine, ref kind }
                if machine == "plain" && kind == "FiniteStateMachine"
        ));
        assert!(machine.states().is_empty());
    }

    #[test]
    fn foreign_state_handles_are_rejected() {
        let (mut machine, closed, _) = door();
        let mut other = FiniteStateMachine::<&str>::new("other");
        let foreign = other.add_state(State::new("Elsewhere")).unwrap();

        let err = machine.set_transition(closed, "jump", foreign).unwrap_err();

        assert!(matches!(err, FsmError::Configuration { .. }));
        assert!(machine.state(foreign).is_none());
    }

    #[test]
    fn default_target_must_belong_to_machine() {
        let mut other = FiniteStateMachine::<char>::new("other");
        let foreign = other.add_state(State::new("X")).unwrap();
        let mut machine = FiniteStateMachine::<char>::new("main");

        let result = machine.add_state(State::new("A").default_to(foreign));

        assert!(matches!(result, Err(FsmError::Configuration { .. })));
    }

    #[test]
    fn all_transitions_follow_registration_order() {
        let (machine, closed, open) = door();

        let triples: Vec<_> = machine
            .all_transitions()
            .map(|(from, input, to)| (from, *input, to))
            .collect();

        assert_eq!(triples, vec![(closed, "push", open), (open, "pull", closed)]);
    }

    #[test]
    fn hooks_fire_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut machine = FiniteStateMachine::<char>::new("hooks");

        let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());
        let a = machine
            .add_state(
                State::new("A")
                    .initial()
                    .on_input(move |i| l1.lock().unwrap().push(format!("A.input({i})")))
                    .on_exit(move || l2.lock().unwrap().push("A.exit".to_string()))
                    .on_transition(move |_, next| {
                        l3.lock().unwrap().push(format!("A.transition({next})"))
                    }),
            )
            .unwrap();
        let b = machine
            .add_state(
                State::new("B").on_entry(move || l4.lock().unwrap().push("B.entry".to_string())),
            )
            .unwrap();
        machine.set_transition(a, 'x', b).unwrap();

        machine.process(['x']).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["A.input(x)", "A.exit", "A.transition(B)", "B.entry"]
        );
    }

    #[test]
    fn failing_hook_aborts_transition() {
        let mut machine = FiniteStateMachine::<char>::new("guarded");
        let a = machine
            .add_state(
                State::new("A")
                    .initial()
                    .try_on_exit(|| Err(crate::core::HookError::new("locked"))),
            )
            .unwrap();
        let b = machine.add_state(State::new("B")).unwrap();
        machine.set_transition(a, 'x', b).unwrap();
        machine.reset();

        let err = machine.transition(&'x').unwrap_err();

        assert!(matches!(
            err,
            FsmError::Hook { ref state, hook: HookKind::Exit, .. } if state == "A"
        ));
        assert_eq!(machine.current_state(), Some(a));
    }

    #[test]
    fn failing_input_hook_skips_remaining_hooks() {
        let log = Arc::new(Mutex::new(Vec::<&str>::new()));
        let (exit_log, transition_log, entry_log) = (log.clone(), log.clone(), log.clone());
        let mut machine = FiniteStateMachine::<char>::new("guarded");
        let a = machine
            .add_state(
                State::new("A")
                    .initial()
                    .try_on_input(|_| Err(crate::core::HookError::new("rejected")))
                    .on_exit(move || exit_log.lock().unwrap().push("A.exit"))
                    .on_transition(move |_, _| transition_log.lock().unwrap().push("A.transition")),
            )
            .unwrap();
        let b = machine
            .add_state(State::new("B").on_entry(move || entry_log.lock().unwrap().push("B.entry")))
            .unwrap();
        machine.set_transition(a, 'x', b).unwrap();
        machine.reset();

        let err = machine.transition(&'x').unwrap_err();

        assert!(matches!(
            err,
            FsmError::Hook { ref state, hook: HookKind::Input, .. } if state == "A"
        ));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(machine.current_state(), Some(a));
    }

    #[test]
    fn step_to_fires_hooks_without_moving_cursor() {
        let entered = Arc::new(Mutex::new(0));
        let counter = entered.clone();
        let mut machine = FiniteStateMachine::<char>::new("step");
        let a = machine.add_state(State::new("A").initial()).unwrap();
        let b = machine
            .add_state(State::new("B").on_entry(move || *counter.lock().unwrap() += 1))
            .unwrap();
        machine.set_transition(a, 'x', b).unwrap();
        machine.reset();

        assert_eq!(machine.step_to(a, &'x').unwrap(), b);
        assert_eq!(*entered.lock().unwrap(), 1);
        assert_eq!(machine.current_state(), Some(a));
    }

    #[test]
    fn step_to_ignores_default_transition() {
        let mut machine = FiniteStateMachine::<char>::new("step");
        let b = machine.add_state(State::new("B")).unwrap();
        let a = machine.add_state(State::new("A").default_to(b)).unwrap();

        let err = machine.step_to(a, &'q').unwrap_err();

        assert!(matches!(err, FsmError::NoTransition { .. }));
    }

    #[test]
    fn self_loops_are_allowed() {
        let mut machine = FiniteStateMachine::<u8>::new("loop");
        let s = machine.add_state(State::new("S").initial()).unwrap();
        machine.set_transition(s, 0, s).unwrap();

        machine.process([0, 0, 0]).unwrap();

        assert_eq!(machine.current_state(), Some(s));
    }
}
