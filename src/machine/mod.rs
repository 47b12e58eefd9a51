//! Machines that own states and drive inputs through them.
//!
//! # Key Concepts
//!
//! - **FiniteStateMachine**: the base engine (transition, reset, process)
//! - **Acceptor**: classifies an input sequence by its final state
//! - **Transducer**: emits one output per input, with the output chosen by
//!   an [`OutputStrategy`] (state name, Moore or Mealy)
//! - **Registry**: explicit name lookup with a designated default machine

mod acceptor;
mod engine;
mod registry;
mod transducer;

pub use acceptor::Acceptor;
pub use engine::FiniteStateMachine;
pub use registry::{Registry, DEFAULT_MACHINE};
pub use transducer::{OutputStrategy, Outputs, Transducer};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The variant of a machine, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineKind {
    Semiautomaton,
    Acceptor,
    Transducer,
    MooreMachine,
    MealyMachine,
}

impl MachineKind {
    /// Only acceptors keep a set of accepting states.
    pub fn supports_accepting(&self) -> bool {
        matches!(self, Self::Acceptor)
    }
}

impl fmt::Display for MachineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Semiautomaton => "FiniteStateMachine",
            Self::Acceptor => "Acceptor",
            Self::Transducer => "Transducer",
            Self::MooreMachine => "MooreMachine",
            Self::MealyMachine => "MealyMachine",
        };
        f.write_str(name)
    }
}

/// Access to the engine underneath any machine variant.
///
/// Read-only views (`states`, `all_transitions`, `init_state`,
/// `accepting_states`) are reached through [`Machine::engine`].
pub trait Machine {
    type Input;
    type Output;

    fn engine(&self) -> &FiniteStateMachine<Self::Input, Self::Output>;

    fn engine_mut(&mut self) -> &mut FiniteStateMachine<Self::Input, Self::Output>;

    fn machine_name(&self) -> &str {
        self.engine().name()
    }

    fn machine_kind(&self) -> MachineKind {
        self.engine().kind()
    }
}

impl<I, O> Machine for FiniteStateMachine<I, O> {
    type Input = I;
    type Output = O;

    fn engine(&self) -> &FiniteStateMachine<I, O> {
        self
    }

    fn engine_mut(&mut self) -> &mut FiniteStateMachine<I, O> {
        self
    }
}

impl<M: Machine + ?Sized> Machine for Box<M> {
    type Input = M::Input;
    type Output = M::Output;

    fn engine(&self) -> &FiniteStateMachine<M::Input, M::Output> {
        (**self).engine()
    }

    fn engine_mut(&mut self) -> &mut FiniteStateMachine<M::Input, M::Output> {
        (**self).engine_mut()
    }

    fn machine_name(&self) -> &str {
        (**self).machine_name()
    }

    fn machine_kind(&self) -> MachineKind {
        (**self).machine_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_acceptors_support_accepting_states() {
        assert!(MachineKind::Acceptor.supports_accepting());
        assert!(!MachineKind::Semiautomaton.supports_accepting());
        assert!(!MachineKind::Transducer.supports_accepting());
        assert!(!MachineKind::MooreMachine.supports_accepting());
        assert!(!MachineKind::MealyMachine.supports_accepting());
    }

    #[test]
    fn kind_displays_type_name() {
        assert_eq!(MachineKind::Semiautomaton.to_string(), "FiniteStateMachine");
        assert_eq!(MachineKind::MealyMachine.to_string(), "MealyMachine");
    }

    #[test]
    fn machine_trait_exposes_engine() {
        let machine = FiniteStateMachine::<char>::new("plain");

        assert_eq!(machine.machine_name(), "plain");
        assert_eq!(machine.machine_kind(), MachineKind::Semiautomaton);
    }
}
