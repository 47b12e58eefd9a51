//! Acceptors classify an input sequence by its final state.

use crate::core::{FsmError, State, StateId};
use crate::machine::{FiniteStateMachine, Machine, MachineKind};
use std::fmt::Debug;

/// A machine whose `process` answers whether the input is accepted.
///
/// # Example
///
/// ```rust
/// use automata::core::State;
/// use automata::machine::Acceptor;
///
/// let mut contains_b = Acceptor::new("contains_b");
/// let s0 = contains_b.add_state(State::new("S0").initial()).unwrap();
/// let s1 = contains_b.add_state(State::new("S1").accepting()).unwrap();
/// contains_b.set_transition(s0, 'a', s0).unwrap();
/// contains_b.set_transition(s0, 'b', s1).unwrap();
/// contains_b.set_transition(s1, 'a', s1).unwrap();
/// contains_b.set_transition(s1, 'b', s1).unwrap();
///
/// assert!(contains_b.process("aaab".chars()).unwrap());
/// assert!(!contains_b.process("aaaa".chars()).unwrap());
/// ```
pub struct Acceptor<I> {
    engine: FiniteStateMachine<I, ()>,
}

impl<I> Acceptor<I> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            engine: FiniteStateMachine::with_kind(name, MachineKind::Acceptor),
        }
    }

    pub fn name(&self) -> &str {
        self.engine.name()
    }

    /// Attach a state; `accepting` states join the accepting set.
    pub fn add_state(&mut self, state: State<I, ()>) -> Result<StateId, FsmError> {
        self.engine.add_state(state)
    }

    pub fn set_default_transition(&mut self, from: StateId, to: StateId) -> Result<(), FsmError> {
        self.engine.set_default_transition(from, to)
    }

    pub fn state(&self, id: StateId) -> Option<&State<I, ()>> {
        self.engine.state(id)
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.engine.current_state()
    }

    pub fn accepting_states(&self) -> &[StateId] {
        self.engine.accepting_states()
    }

    /// Whether the machine currently sits in an accepting state.
    pub fn is_accepting(&self) -> bool {
        self.engine
            .current_state()
            .is_some_and(|current| self.engine.is_accepting(current))
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

impl<I: PartialEq + Debug> Acceptor<I> {
    pub fn set_transition(&mut self, from: StateId, input: I, to: StateId) -> Result<(), FsmError> {
        self.engine.set_transition(from, input, to)
    }

    pub fn transition(&mut self, input: &I) -> Result<StateId, FsmError> {
        self.engine.transition(input)
    }

    /// Reset, run every input and report whether the final state accepts.
    ///
    /// An input without a valid transition aborts with an error rather than
    /// rejecting.
    pub fn process<T>(&mut self, inputs: T) -> Result<bool, FsmError>
    where
        T: IntoIterator<Item = I>,
    {
        self.engine.process(inputs)?;
        let accepted = self.is_accepting();
        tracing::debug!(machine = %self.engine.name(), accepted, "input classified");
        Ok(accepted)
    }
}

impl<I> Machine for Acceptor<I> {
    type Input = I;
    type Output = ();

    fn engine(&self) -> &FiniteStateMachine<I, ()> {
        &self.engine
    }

    fn engine_mut(&mut self) -> &mut FiniteStateMachine<I, ()> {
        &mut self.engine
    }
}
