//! Acceptor Example
//!
//! Classifies words over {a, b} by whether they contain a 'b'.
//!
//! Key concepts:
//! - Accepting states
//! - Wiring with the `transitions!` macro
//! - Undefined inputs abort instead of rejecting
//!
//! Run with: cargo run --example contains_b

use automata::core::State;
use automata::machine::Acceptor;
use automata::transitions;

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Acceptor Example ===\n");

    let mut contains_b = Acceptor::new("contains_b");
    let s0 = contains_b.add_state(State::new("S0").initial()).unwrap();
    let s1 = contains_b.add_state(State::new("S1").accepting()).unwrap();

    transitions!(contains_b;
        (s0, 'a') => s0,
        (s0, 'b') => s1,
        (s1, 'a') => s1,
        (s1, 'b') => s1,
    )
    .unwrap();

    for word in ["aaab", "aaaa", "", "bab", "abc"] {
        match contains_b.process(word.chars()) {
            Ok(true) => println!("{word:?}: accepted"),
            Ok(false) => println!("{word:?}: rejected"),
            Err(err) => println!("{word:?}: error: {err}"),
        }
    }

    println!("\n=== Example Complete ===");
}
