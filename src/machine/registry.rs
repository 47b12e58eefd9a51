//! Name lookup for machines, with one designated default machine.

use crate::core::{FsmError, State, StateId};
use crate::machine::Machine;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Reserved name that always resolves to the default machine.
pub const DEFAULT_MACHINE: &str = "default";

/// Owns machines and finds them by name.
///
/// Machines of different types can share a registry through
/// `Registry<Box<dyn Machine<Input = I, Output = O>>>`.
///
/// Registering a machine under a name already in use replaces the machine
/// stored for that name. A replaced machine that was the default stays
/// reachable as the default until another default is registered.
///
/// # Example
///
/// ```rust
/// use automata::core::State;
/// use automata::machine::{Acceptor, Registry, DEFAULT_MACHINE};
///
/// let mut registry = Registry::new();
/// registry.register(Acceptor::<char>::new("first"), true);
///
/// // No explicit machine: the state attaches to the default one.
/// let start = registry.add_state(State::new("Start").initial(), None).unwrap();
/// assert!(start.is_some());
/// assert_eq!(registry.get(DEFAULT_MACHINE).unwrap().name(), "first");
/// ```
pub struct Registry<M> {
    machines: HashMap<String, M>,
    default: Option<DefaultMachine<M>>,
}

/// Where the default machine lives.
enum DefaultMachine<M> {
    /// The machine registered under this name.
    Named(String),
    /// A default whose name was taken over by a non-default registration.
    Shadowed(M),
}

impl<M> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Registry<M> {
    pub fn new() -> Self {
        Self {
            machines: HashMap::new(),
            default: None,
        }
    }

    pub fn default_machine(&self) -> Option<&M> {
        match &self.default {
            Some(DefaultMachine::Named(name)) => self.machines.get(name),
            Some(DefaultMachine::Shadowed(machine)) => Some(machine),
            None => None,
        }
    }

    pub fn default_machine_mut(&mut self) -> Option<&mut M> {
        match &mut self.default {
            Some(DefaultMachine::Named(name)) => self.machines.get_mut(name.as_str()),
            Some(DefaultMachine::Shadowed(machine)) => Some(machine),
            None => None,
        }
    }

    /// Number of distinct names registered.
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.machines.keys().map(String::as_str)
    }

    fn default_is_named(&self, name: &str) -> bool {
        matches!(&self.default, Some(DefaultMachine::Named(current)) if current == name)
    }
}

impl<M: Machine> Registry<M> {
    /// Store `machine` under its name, and as the default when `default` is
    /// set or the name is [`DEFAULT_MACHINE`].
    ///
    /// A machine displaced from its name is dropped, unless it is the
    /// current default; then it is kept until another default is registered.
    pub fn register(&mut self, machine: M, default: bool) -> &mut M {
        let name = machine.machine_name().to_owned();
        let is_default = default || name == DEFAULT_MACHINE;

        if !is_default && self.default_is_named(&name) {
            if let Some(previous) = self.machines.remove(&name) {
                tracing::debug!(machine = %name, "registry entry replaced; previous kept as default");
                self.default = Some(DefaultMachine::Shadowed(previous));
            }
        }
        if is_default {
            self.default = Some(DefaultMachine::Named(name.clone()));
            tracing::debug!(machine = %name, "default machine set");
        }

        match self.machines.entry(name) {
            Entry::Occupied(mut entry) => {
                tracing::debug!(machine = %entry.key(), "registry entry replaced");
                *entry.get_mut() = machine;
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(machine),
        }
    }

    /// Find a machine by name; [`DEFAULT_MACHINE`] yields the default.
    pub fn get(&self, name: &str) -> Option<&M> {
        if name == DEFAULT_MACHINE {
            return self.default_machine();
        }
        self.machines.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut M> {
        if name == DEFAULT_MACHINE {
            return self.default_machine_mut();
        }
        self.machines.get_mut(name)
    }

    /// Attach `state` to the named machine, or to the default machine when
    /// `machine` is `None`.
    ///
    /// Returns `Ok(None)` when no machine is named and no default exists;
    /// the state is then dropped without being recorded anywhere.
    pub fn add_state(
        &mut self,
        state: State<M::Input, M::Output>,
        machine: Option<&str>,
    ) -> Result<Option<StateId>, FsmError> {
        let target = match machine {
            Some(name) => Some(self.get_mut(name).ok_or_else(|| {
                FsmError::configuration(format!("no machine named '{name}' is registered"))
            })?),
            None => self.default_machine_mut(),
        };

        match target {
            Some(target) => target.engine_mut().add_state(state).map(Some),
            None => {
                tracing::trace!(state = state.name(), "no default machine; state left unattached");
                Ok(None)
            }
        }
    }
}
