//! Traffic Light Moore Machine
//!
//! This example demonstrates a cyclic Moore machine.
//!
//! Key concepts:
//! - Outputs stored on states
//! - Output read before each transition
//! - Entry hooks for side effects
//!
//! Run with: cargo run --example traffic_light

use automata::core::State;
use automata::machine::Transducer;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light Moore Machine ===\n");

    let mut light = Transducer::moore("traffic_light");
    let red = light
        .add_state(
            State::new("Red")
                .initial()
                .output("stop")
                .on_entry(|| println!("  [light turns red]")),
        )
        .unwrap();
    let green = light
        .add_state(
            State::new("Green")
                .output("go")
                .on_entry(|| println!("  [light turns green]")),
        )
        .unwrap();
    let yellow = light
        .add_state(
            State::new("Yellow")
                .output("caution")
                .on_entry(|| println!("  [light turns yellow]")),
        )
        .unwrap();

    light.set_transition(red, "tick", green).unwrap();
    light.set_transition(green, "tick", yellow).unwrap();
    light.set_transition(yellow, "tick", red).unwrap();

    println!("Six ticks:");
    for output in light.process(["tick"; 6], true) {
        match output {
            Ok(Some(signal)) => println!("signal: {signal}"),
            Ok(None) => println!("signal: <none>"),
            Err(err) => println!("error: {err}"),
        }
    }

    println!("\n=== Example Complete ===");
}
