//! States, their transition tables and lifecycle hooks.
//!
//! A [`State`] is built standalone with fluent builder methods and then
//! attached to exactly one machine, which hands back a [`StateId`]. From then
//! on the machine owns the state; callers refer to it only by handle.

use super::error::{HookError, HookResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use uuid::Uuid;

/// Identity handle of a state inside one machine.
///
/// Two handles are equal only if they were issued by the same machine for
/// the same slot, so states with identical names stay distinguishable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct StateId {
    machine: Uuid,
    index: usize,
}

impl StateId {
    pub(crate) fn new(machine: Uuid, index: usize) -> Self {
        Self { machine, index }
    }

    /// Position of the state in its machine's state list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn machine(&self) -> Uuid {
        self.machine
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

type ActionHook = Box<dyn FnMut() -> HookResult + Send>;
type InputHook<I> = Box<dyn FnMut(&I) -> HookResult + Send>;
type TransitionHook = Box<dyn FnMut(StateId, &str) -> HookResult + Send>;

/// The four lifecycle callbacks. Unset hooks are no-ops.
pub(crate) struct Hooks<I> {
    pub(crate) entry: Option<ActionHook>,
    pub(crate) exit: Option<ActionHook>,
    pub(crate) input: Option<InputHook<I>>,
    pub(crate) transition: Option<TransitionHook>,
}

impl<I> Default for Hooks<I> {
    fn default() -> Self {
        Self {
            entry: None,
            exit: None,
            input: None,
            transition: None,
        }
    }
}

impl<I> Hooks<I> {
    pub(crate) fn fire_input(&mut self, input: &I) -> HookResult {
        self.input.as_mut().map_or(Ok(()), |hook| hook(input))
    }

    pub(crate) fn fire_exit(&mut self) -> HookResult {
        self.exit.as_mut().map_or(Ok(()), |hook| hook())
    }

    pub(crate) fn fire_transition(&mut self, next: StateId, next_name: &str) -> HookResult {
        self.transition
            .as_mut()
            .map_or(Ok(()), |hook| hook(next, next_name))
    }

    pub(crate) fn fire_entry(&mut self) -> HookResult {
        self.entry.as_mut().map_or(Ok(()), |hook| hook())
    }
}

/// A named node of a finite state machine.
///
/// `I` is the input symbol type, `O` the output value type used by Moore
/// and Mealy transducers.
///
/// # Example
///
/// ```rust
/// use automata::core::State;
/// use automata::machine::Acceptor;
///
/// let mut machine = Acceptor::new("contains_b");
/// let s0 = machine.add_state(State::new("S0").initial()).unwrap();
/// let s1 = machine.add_state(State::new("S1").accepting()).unwrap();
///
/// machine.set_transition(s0, 'a', s0).unwrap();
/// machine.set_transition(s0, 'b', s1).unwrap();
///
/// let state = machine.state(s0).unwrap();
/// assert_eq!(state.name(), "S0");
/// assert_eq!(state.destination(&'b'), Some(s1));
/// ```
pub struct State<I, O = ()> {
    name: String,
    initial: bool,
    accepting: bool,
    transitions: Vec<(I, StateId)>,
    output_values: Vec<(Option<I>, Option<O>)>,
    default_transition: Option<StateId>,
    pub(crate) hooks: Hooks<I>,
}

impl<I, O> State<I, O> {
    /// Create a state with no transitions, no output and no-op hooks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: false,
            accepting: false,
            transitions: Vec::new(),
            output_values: vec![(None, None)],
            default_transition: None,
            hooks: Hooks::default(),
        }
    }

    /// Mark this state as its machine's initial state.
    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }

    /// Mark this state as accepting. Only acceptors support this.
    pub fn accepting(mut self) -> Self {
        self.accepting = true;
        self
    }

    /// Set the Moore-style output stored on the state.
    pub fn output(mut self, value: O) -> Self {
        self.output_values[0].1 = Some(value);
        self
    }

    /// Fall back to `target` when no exact transition matches an input.
    pub fn default_to(mut self, target: StateId) -> Self {
        self.default_transition = Some(target);
        self
    }

    /// Called when the machine moves into this state, after the source's
    /// `on_transition`.
    pub fn on_entry<F>(self, mut hook: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.try_on_entry(move || {
            hook();
            Ok(())
        })
    }

    /// Like [`State::on_entry`], but an `Err` aborts the transition and the
    /// machine stays in the source state.
    pub fn try_on_entry<F>(mut self, hook: F) -> Self
    where
        F: FnMut() -> HookResult + Send + 'static,
    {
        self.hooks.entry = Some(Box::new(hook));
        self
    }

    /// Called when the machine leaves this state, after `on_input`.
    pub fn on_exit<F>(self, mut hook: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.try_on_exit(move || {
            hook();
            Ok(())
        })
    }

    /// Fallible [`State::on_exit`]; an `Err` skips the remaining hooks.
    pub fn try_on_exit<F>(mut self, hook: F) -> Self
    where
        F: FnMut() -> HookResult + Send + 'static,
    {
        self.hooks.exit = Some(Box::new(hook));
        self
    }

    /// Called with the input symbol before leaving this state.
    pub fn on_input<F>(self, mut hook: F) -> Self
    where
        F: FnMut(&I) + Send + 'static,
    {
        self.try_on_input(move |input| {
            hook(input);
            Ok(())
        })
    }

    /// Fallible [`State::on_input`]; an `Err` aborts before any other hook runs.
    pub fn try_on_input<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&I) -> HookResult + Send + 'static,
    {
        self.hooks.input = Some(Box::new(hook));
        self
    }

    /// Called with the destination's handle and name after `on_exit`.
    pub fn on_transition<F>(self, mut hook: F) -> Self
    where
        F: FnMut(StateId, &str) + Send + 'static,
    {
        self.try_on_transition(move |next, name| {
            hook(next, name);
            Ok(())
        })
    }

    /// Fallible [`State::on_transition`]; an `Err` skips the destination's
    /// `on_entry`.
    pub fn try_on_transition<F>(mut self, hook: F) -> Self
    where
        F: FnMut(StateId, &str) -> Result<(), HookError> + Send + 'static,
    {
        self.hooks.transition = Some(Box::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the state was built with [`State::initial`].
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Whether the state was built with [`State::accepting`].
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// The Moore-style output stored on the state.
    pub fn stored_output(&self) -> Option<&O> {
        self.output_values[0].1.as_ref()
    }

    /// All recorded `(input, output)` pairs. Entry 0 is `(None, stored output)`.
    pub fn output_values(&self) -> &[(Option<I>, Option<O>)] {
        &self.output_values
    }

    pub fn default_transition(&self) -> Option<StateId> {
        self.default_transition
    }

    /// Transitions in registration order.
    pub fn transitions(&self) -> impl Iterator<Item = (&I, StateId)> + '_ {
        self.transitions.iter().map(|(input, dest)| (input, *dest))
    }

    pub(crate) fn set_default_transition(&mut self, target: StateId) {
        self.default_transition = Some(target);
    }
}

impl<I: PartialEq, O> State<I, O> {
    /// Exact-match destination for `input`. Fires no hooks.
    pub fn destination(&self, input: &I) -> Option<StateId> {
        self.transitions
            .iter()
            .find(|(key, _)| key == input)
            .map(|(_, dest)| *dest)
    }

    /// Mealy-style output registered for `input`. The latest registration wins.
    pub fn output_for(&self, input: &I) -> Option<&O> {
        self.output_values
            .iter()
            .skip(1)
            .rev()
            .find(|(key, _)| key.as_ref() == Some(input))
            .and_then(|(_, value)| value.as_ref())
    }

    /// Register `dest` for `input`, replacing an earlier destination in place.
    pub(crate) fn insert_transition(&mut self, input: I, dest: StateId) {
        match self.transitions.iter_mut().find(|(key, _)| *key == input) {
            Some(entry) => entry.1 = dest,
            None => self.transitions.push((input, dest)),
        }
    }

    pub(crate) fn push_output(&mut self, input: I, output: O) {
        self.output_values.push((Some(input), Some(output)));
    }
}

impl<I: Debug, O: Debug> Debug for State<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("initial", &self.initial)
            .field("accepting", &self.accepting)
            .field("transitions", &self.transitions)
            .field("output_values", &self.output_values)
            .field("default_transition", &self.default_transition)
            .finish_non_exhaustive()
    }
}
