//! Core circuit model.
//!
//! This module contains the building blocks the simulator works on:
//! - The logic value alphabet
//! - Truth tables and the machines defined by them
//! - Connections between machine ports
//! - State snapshots and the history that decides when a run stops
//!
//! Nothing in here knows about the circuit graph; that lives in
//! [`crate::circuit`].

mod connection;
mod error;
mod history;
mod machine;
mod state;
mod truth_table;
mod value;

pub use connection::{Connection, Endpoint, Port};
pub use error::{ModelError, TableDefect};
pub use history::{Snapshot, StateHistory, StopReason};
pub use machine::{LogicElement, Machine, MachineId, MachineName, SimpleMachine};
pub use state::{State, StateEntry, StateLookupError};
pub use truth_table::TruthTable;
pub use value::Value;
