//! Serializable snapshot of a machine's graph.
//!
//! A [`Topology`] holds everything a diagram or export tool needs: the
//! states with their flags and default transitions, the initial state, and
//! every labelled edge. It carries no hooks and no cursor, so it can be
//! serialized and inspected freely.

use crate::machine::{FiniteStateMachine, MachineKind};
use serde::{Deserialize, Serialize};

/// A state as seen by export tools. `default` is the index of the state's
/// "else" target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateNode<O> {
    pub index: usize,
    pub name: String,
    pub initial: bool,
    pub accepting: bool,
    pub output: Option<O>,
    pub default: Option<usize>,
}

/// One labelled transition. `output` is set for Mealy registrations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge<I, O> {
    pub source: usize,
    pub input: I,
    pub destination: usize,
    pub output: Option<O>,
}

/// Read-only graph of a machine, in state-list and registration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Topology<I, O> {
    pub name: String,
    pub kind: MachineKind,
    pub init_state: Option<usize>,
    pub states: Vec<StateNode<O>>,
    pub edges: Vec<Edge<I, O>>,
}

impl<I, O> FiniteStateMachine<I, O>
where
    I: Clone + PartialEq,
    O: Clone,
{
    /// Snapshot the machine's states and transitions.
    ///
    /// `initial` marks the machine's effective initial state, so only one
    /// node carries it even if several states were built as initial.
    pub fn topology(&self) -> Topology<I, O> {
        let init_state = self.init_state().map(|id| id.index());
        let states = self
            .state_ids()
            .zip(self.states())
            .map(|(id, state)| StateNode {
                index: id.index(),
                name: state.name().to_owned(),
                initial: init_state == Some(id.index()),
                accepting: self.is_accepting(id),
                output: state.stored_output().cloned(),
                default: state.default_transition().map(|target| target.index()),
            })
            .collect();

        let edges = self
            .all_transitions()
            .map(|(source, input, destination)| Edge {
                source: source.index(),
                input: input.clone(),
                destination: destination.index(),
                output: self.states()[source.index()]
                    .output_for(input)
                    .cloned(),
            })
            .collect();

        Topology {
            name: self.name().to_owned(),
            kind: self.kind(),
            init_state,
            states,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;
    use crate::machine::{Acceptor, Machine, Transducer};

    #[test]
    fn acceptor_topology_marks_accepting_and_initial() {
        let mut machine = Acceptor::new("contains_b");
        let s0 = machine.add_state(State::new("S0").initial()).unwrap();
        let s1 = machine.add_state(State::new("S1").accepting()).unwrap();
        machine.set_transition(s0, 'a', s0).unwrap();
        machine.set_transition(s0, 'b', s1).unwrap();
        machine.set_default_transition(s1, s1).unwrap();

        let topology = machine.engine().topology();

        assert_eq!(topology.kind, MachineKind::Acceptor);
        assert_eq!(topology.init_state, Some(0));
        assert!(topology.states[0].initial);
        assert!(!topology.states[0].accepting);
        assert!(topology.states[1].accepting);
        assert_eq!(topology.states[1].default, Some(1));
        assert_eq!(
            topology
                .edges
                .iter()
                .map(|e| (e.source, e.input, e.destination))
                .collect::<Vec<_>>(),
            vec![(0, 'a', 0), (0, 'b', 1)]
        );
    }

    #[test]
    fn mealy_edges_carry_outputs() {
        let mut machine = Transducer::mealy("edge_outputs");
        let a = machine.add_state(State::new("A").initial()).unwrap();
        let b = machine.add_state(State::new("B")).unwrap();
        machine.set_transition_with_output(a, 1u8, "one", b).unwrap();
        machine.set_transition(b, 0u8, a).unwrap();

        let topology = machine.engine().topology();

        assert_eq!(topology.edges[0].output, Some("one"));
        assert_eq!(topology.edges[1].output, None);
    }

    #[test]
    fn topology_serializes_to_json() {
        let mut machine: Transducer<String, String> = Transducer::moore("lights");
        let red = machine
            .add_state(State::new("RED").initial().output("stop".to_string()))
            .unwrap();
        let green = machine
            .add_state(State::new("GREEN").output("go".to_string()))
            .unwrap();
        machine.set_transition(red, "tick".to_string(), green).unwrap();
        machine.set_transition(green, "tick".to_string(), red).unwrap();

        let topology = machine.engine().topology();
        let json = serde_json::to_string(&topology).unwrap();
        let restored: Topology<String, String> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, topology);
        assert_eq!(restored.states[1].output.as_deref(), Some("go"));
    }
}
