//! logic-sim: a zero-delay combinational circuit simulator
//!
//! Circuits are built from machines, each defined by a total truth table,
//! wired together output-to-input. Simulation has no clock: signals are
//! pushed from the constant sources through the graph until the circuit
//! stops changing or is found to oscillate, and the final snapshot of every
//! machine's outputs is returned.
//!
//! # Core Concepts
//!
//! - **Value**: `Low`, `High`, `Undefined` (plus the reserved `Disconnected`)
//! - **Machine**: a named element with a total truth table
//! - **Circuit**: machines plus directed connections between their ports
//! - **State / StateHistory**: output snapshots and the log that decides
//!   when a run stops
//!
//! # Example
//!
//! ```rust
//! use logic_sim::catalog::{self, A, B};
//! use logic_sim::circuit::Circuit;
//! use logic_sim::core::Value;
//!
//! let mut circuit = Circuit::new();
//! circuit.add_machine("highSource", catalog::on()).unwrap();
//! circuit.add_machine("or", catalog::or()).unwrap();
//! circuit.add_machine("not", catalog::not()).unwrap();
//! circuit.add_connection("highSource", A, "or", A).unwrap();
//! circuit.add_connection("or", A, "or", B).unwrap();
//! circuit.add_connection("or", A, "not", A).unwrap();
//!
//! let state = circuit.simulate();
//! assert_eq!(state.outputs("or"), Some(&[Value::High][..]));
//! assert_eq!(state.outputs("not"), Some(&[Value::Low][..]));
//! print!("{state}");
//! ```

pub mod builder;
pub mod catalog;
pub mod circuit;
pub mod core;
mod render;

// Re-export commonly used types
pub use crate::builder::CircuitBuilder;
pub use crate::circuit::{Circuit, CircuitError};
pub use crate::core::{State, StateHistory, TruthTable, Value};
