//! Feedback Loop
//!
//! A self-latching OR gate driving a chain of inverters into an AND gate.
//!
//! Key concepts:
//! - Constant sources (ON) start the propagation
//! - A machine feeding its own input reads that input as LOW
//! - The run ends once a step leaves the circuit unchanged
//!
//! Run with: RUST_LOG=debug cargo run --example feedback_loop

use logic_sim::catalog::{self, A, B};
use logic_sim::{CircuitBuilder, CircuitError};

fn main() -> Result<(), CircuitError> {
    env_logger::init();

    println!("=== Feedback Loop ===\n");

    let mut circuit = CircuitBuilder::new()
        .machine("highSource", catalog::on())
        .machine("not", catalog::not())
        .machine("or", catalog::or())
        .machine("highSource2", catalog::on())
        .machine("not2", catalog::not())
        .machine("and", catalog::and())
        .connect("highSource", A, "or", A)
        .connect("or", A, "or", B)
        .connect("or", A, "not", A)
        .connect("highSource2", A, "and", A)
        .connect("not2", A, "and", B)
        .connect("not", A, "not2", A)
        .build()?;

    let state = circuit.simulate();

    println!("Output of the \"and\" machine:");
    if let Some(outputs) = state.outputs("and") {
        println!("  {outputs:?}\n");
    }

    println!("Whole circuit:");
    print!("{state}");

    println!("\nSnapshots recorded: {}", circuit.history().len());
    if let Some(reason) = circuit.history().stop_reason() {
        println!("Stopped because: {reason:?}");
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
