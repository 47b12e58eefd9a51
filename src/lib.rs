//! Automata: finite state machines with lifecycle hooks.
//!
//! States are plain values built with a fluent API and attached to a
//! machine, which hands back identity handles. The machine drives inputs
//! through its states, firing each state's hooks in a fixed order:
//! `on_input`, `on_exit`, `on_transition` of the source, then `on_entry` of
//! the destination.
//!
//! # Core Concepts
//!
//! - **FiniteStateMachine**: tracks the current state (a semiautomaton)
//! - **Acceptor**: accepts or rejects an input sequence
//! - **Transducer**: turns inputs into outputs; Moore machines read outputs
//!   from states, Mealy machines from transitions
//!
//! # Example
//!
//! ```rust
//! use automata::core::State;
//! use automata::machine::Acceptor;
//! use automata::transitions;
//!
//! let mut contains_b = Acceptor::new("contains_b");
//! let s0 = contains_b.add_state(State::new("S0").initial()).unwrap();
//! let s1 = contains_b.add_state(State::new("S1").accepting()).unwrap();
//!
//! transitions!(contains_b;
//!     (s0, 'a') => s0,
//!     (s0, 'b') => s1,
//!     (s1, 'a') => s1,
//!     (s1, 'b') => s1,
//! )
//! .unwrap();
//!
//! assert!(contains_b.process("aaab".chars()).unwrap());
//! assert!(!contains_b.process("aaaa".chars()).unwrap());
//! assert!(!contains_b.process("".chars()).unwrap());
//! ```

mod macros;

pub mod core;
pub mod machine;
pub mod topology;

/// Crate version, for packaging tools.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use crate::core::{FsmError, State, StateId};
pub use crate::machine::{Acceptor, FiniteStateMachine, Machine, Transducer};
