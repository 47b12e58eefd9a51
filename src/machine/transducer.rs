//! Transducers: machines that emit one output per processed input.

use crate::core::{FsmError, State, StateId};
use crate::machine::{FiniteStateMachine, Machine, MachineKind};
use std::fmt::{self, Debug};
use std::iter::FusedIterator;

/// How a transducer derives the output for the current state and input.
pub enum OutputStrategy<O> {
    /// The current state's name, converted into `O`.
    StateName(fn(&str) -> O),
    /// The output stored on the current state (Moore).
    StateStored,
    /// The output registered for the input on the current state (Mealy).
    TransitionKeyed,
}

impl<O> OutputStrategy<O> {
    fn kind(&self) -> MachineKind {
        match self {
            Self::StateName(_) => MachineKind::Transducer,
            Self::StateStored => MachineKind::MooreMachine,
            Self::TransitionKeyed => MachineKind::MealyMachine,
        }
    }
}

impl<O> Clone for OutputStrategy<O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O> Copy for OutputStrategy<O> {}

impl<O> Debug for OutputStrategy<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateName(_) => f.write_str("StateName"),
            Self::StateStored => f.write_str("StateStored"),
            Self::TransitionKeyed => f.write_str("TransitionKeyed"),
        }
    }
}

/// A machine producing a lazy sequence of outputs while it traverses.
///
/// Moore and Mealy machines are transducers built with [`Transducer::moore`]
/// and [`Transducer::mealy`]; the constructor fixes the [`OutputStrategy`].
///
/// # Example
///
/// ```rust
/// use automata::core::State;
/// use automata::machine::Transducer;
///
/// let mut light = Transducer::moore("traffic_light");
/// let red = light.add_state(State::new("RED").initial().output("stop")).unwrap();
/// let green = light.add_state(State::new("GREEN").output("go")).unwrap();
/// light.set_transition(red, "tick", green).unwrap();
/// light.set_transition(green, "tick", red).unwrap();
///
/// let outputs: Vec<_> = light
///     .process(["tick", "tick", "tick"], true)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(outputs, vec![Some("stop"), Some("go"), Some("stop")]);
/// ```
pub struct Transducer<I, O> {
    engine: FiniteStateMachine<I, O>,
    strategy: OutputStrategy<O>,
}

impl<I> Transducer<I, String> {
    /// A transducer that emits the current state's name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_strategy(name, OutputStrategy::StateName(|state| state.to_owned()))
    }
}

impl<I, O> Transducer<I, O> {
    /// A Moore machine: outputs come from [`State::output`].
    pub fn moore(name: impl Into<String>) -> Self {
        Self::with_strategy(name, OutputStrategy::StateStored)
    }

    /// A Mealy machine: outputs come from
    /// [`Transducer::set_transition_with_output`].
    pub fn mealy(name: impl Into<String>) -> Self {
        Self::with_strategy(name, OutputStrategy::TransitionKeyed)
    }

    pub fn with_strategy(name: impl Into<String>, strategy: OutputStrategy<O>) -> Self {
        Self {
            engine: FiniteStateMachine::with_kind(name, strategy.kind()),
            strategy,
        }
    }

    pub fn name(&self) -> &str {
        self.engine.name()
    }

    pub fn strategy(&self) -> OutputStrategy<O> {
        self.strategy
    }

    /// Attach a state. Transducers reject `accepting` states.
    pub fn add_state(&mut self, state: State<I, O>) -> Result<StateId, FsmError> {
        self.engine.add_state(state)
    }

    pub fn set_default_transition(&mut self, from: StateId, to: StateId) -> Result<(), FsmError> {
        self.engine.set_default_transition(from, to)
    }

    pub fn state(&self, id: StateId) -> Option<&State<I, O>> {
        self.engine.state(id)
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.engine.current_state()
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

impl<I: PartialEq + Debug, O> Transducer<I, O> {
    pub fn set_transition(&mut self, from: StateId, input: I, to: StateId) -> Result<(), FsmError> {
        self.engine.set_transition(from, input, to)
    }

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
        self.engine
            .set_transition_with_output(from, input, output, to)
    }

    pub fn transition(&mut self, input: &I) -> Result<StateId, FsmError> {
        self.engine.transition(input)
    }

    /// Output for `input` from the current state, without transitioning.
    ///
    /// `Ok(None)` is the "no output" marker: a Moore state without a stored
    /// output, or a Mealy input without a registered output.
    pub fn output(&self, input: &I) -> Result<Option<O>, FsmError>
    where
        O: Clone,
    {
        let state = self.engine.current_state_ref()?;
        let output = match self.strategy {
            OutputStrategy::StateName(to_output) => Some(to_output(state.name())),
            OutputStrategy::StateStored => state.stored_output().cloned(),
            OutputStrategy::TransitionKeyed => state.output_for(input).cloned(),
        };
        Ok(output)
    }

    /// Lazily translate `inputs` into outputs.
    ///
    /// Nothing runs until the first pull, which resets the machine. For each
    /// input the output is computed before the transition. With
    /// `yield_none == false`, `None` outputs are skipped. The transition for
    /// an emitted output runs when the next item is pulled, so dropping the
    /// iterator early leaves later inputs untouched.
    pub fn process<T>(&mut self, inputs: T, yield_none: bool) -> Outputs<'_, I, O, T::IntoIter>
    where
        T: IntoIterator<Item = I>,
    {
        Outputs {
            machine: self,
            inputs: inputs.into_iter(),
            yield_none,
            started: false,
            pending: None,
            done: false,
        }
    }
}

impl<I, O> Machine for Transducer<I, O> {
    type Input = I;
    type Output = O;

    fn engine(&self) -> &FiniteStateMachine<I, O> {
        &self.engine
    }

    fn engine_mut(&mut self) -> &mut FiniteStateMachine<I, O> {
        &mut self.engine
    }
}

/// Iterator returned by [`Transducer::process`].
///
/// Each pull advances the machine by at most one emitted input. After an
/// error the iterator yields nothing more.
pub struct Outputs<'m, I, O, T> {
    machine: &'m mut Transducer<I, O>,
    inputs: T,
    yield_none: bool,
    started: bool,
    pending: Option<I>,
    done: bool,
}

impl<I, O, T> Outputs<'_, I, O, T>
where
    I: PartialEq + Debug,
    O: Clone,
    T: Iterator<Item = I>,
{
    fn advance(&mut self) -> Result<Option<Option<O>>, FsmError> {
        if !self.started {
            self.started = true;
            self.machine.reset();
        }
        if let Some(input) = self.pending.take() {
            self.machine.transition(&input)?;
        }
        for input in self.inputs.by_ref() {
            let output = self.machine.output(&input)?;
            if self.yield_none || output.is_some() {
                self.pending = Some(input);
                return Ok(Some(output));
            }
            self.machine.transition(&input)?;
        }
        Ok(None)
    }
}

impl<I, O, T> Iterator for Outputs<'_, I, O, T>
where
    I: PartialEq + Debug,
    O: Clone,
    T: Iterator<Item = I>,
{
    type Item = Result<Option<O>, FsmError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(output)) => Some(Ok(output)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<I, O, T> FusedIterator for Outputs<'_, I, O, T>
where
    I: PartialEq + Debug,
    O: Clone,
    T: Iterator<Item = I>,
{
}
