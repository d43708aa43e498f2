//! Three-Input Function
//!
//! Evaluates Y = ¬X1·X2 + X1·¬X2 + ¬X2·X3 with NOT, AND and OR gates.
//!
//! Run with: cargo run --example three_input_function

use logic_sim::catalog::{self, A, B};
use logic_sim::core::TruthTable;
use logic_sim::{Circuit, CircuitBuilder, CircuitError};

fn source(level: bool) -> TruthTable {
    if level {
        catalog::on()
    } else {
        catalog::off()
    }
}

fn build(x1: bool, x2: bool, x3: bool) -> Result<Circuit, CircuitError> {
    CircuitBuilder::new()
        .machine("X1", source(x1))
        .machine("X2", source(x2))
        .machine("X3", source(x3))
        .machine("not1", catalog::not())
        .machine("not2", catalog::not())
        .machine("and1", catalog::and())
        .machine("and2", catalog::and())
        .machine("and3", catalog::and())
        .machine("or1", catalog::or())
        .machine("or2", catalog::or())
        .connect("X1", A, "not1", A)
        .connect("X1", A, "and2", A)
        .connect("X2", A, "not2", A)
        .connect("X2", A, "and1", B)
        .connect("X3", A, "and3", B)
        .connect("not1", A, "and1", A)
        .connect("not2", A, "and2", B)
        .connect("not2", A, "and3", A)
        .connect("and1", A, "or1", A)
        .connect("and2", A, "or1", B)
        .connect("and3", A, "or2", B)
        .connect("or1", A, "or2", A)
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Three-Input Function ===\n");

    let mut circuit = build(true, true, true)?;
    let state = circuit.simulate();
    println!("Y for X1, X2, X3 = HIGH: {}", state.output("or2", A)?);
    if let Some(outputs) = state.outputs("and1") {
        println!("Output of the \"and1\" machine: {outputs:?}\n");
    }
    println!("Whole circuit:");
    print!("{state}");

    println!("\nFull truth table:");
    println!("  X1 X2 X3 | Y");
    for bits in 0..8u8 {
        let (x1, x2, x3) = (bits & 4 != 0, bits & 2 != 0, bits & 1 != 0);
        let y = build(x1, x2, x3)?.simulate().output("or2", A)?;
        println!("  {:>2} {:>2} {:>2} | {y}", u8::from(x1), u8::from(x2), u8::from(x3));
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
