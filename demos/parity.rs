//! Mealy Machine Example
//!
//! Reports every change of parity in a stream of bits.
//!
//! Key concepts:
//! - Outputs attached to transitions
//! - Suppressing "no output" with `yield_none = false`
//! - Default ("else") transitions
//! - Exporting the machine topology as JSON
//!
//! Run with: cargo run --example parity

use automata::core::State;
use automata::machine::{Machine, Transducer};

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Mealy Parity Example ===\n");

    let mut parity = Transducer::mealy("parity");
    let even = parity.add_state(State::new("Even").initial()).unwrap();
    let odd = parity.add_state(State::new("Odd")).unwrap();

    parity
        .set_transition_with_output(even, 1u8, "now odd", odd)
        .unwrap();
    parity
        .set_transition_with_output(odd, 1u8, "now even", even)
        .unwrap();
    // Any other symbol leaves the parity unchanged.
    parity.set_default_transition(even, even).unwrap();
    parity.set_default_transition(odd, odd).unwrap();

    let bits = [1, 0, 0, 1, 1, 0, 1];
    println!("Input: {bits:?}");
    for output in parity.process(bits, false) {
        match output {
            Ok(Some(change)) => println!("  {change}"),
            Ok(None) => {}
            Err(err) => println!("  error: {err}"),
        }
    }

    let topology = parity.engine().topology();
    println!("\nTopology:");
    for edge in &topology.edges {
        println!(
            "  {} --{}/{}--> {}",
            topology.states[edge.source].name,
            edge.input,
            edge.output.unwrap_or("-"),
            topology.states[edge.destination].name
        );
    }

    println!("\nAs JSON:\n{}", serde_json::to_string_pretty(&topology).unwrap());

    println!("\n=== Example Complete ===");
}
