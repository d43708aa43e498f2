//! Errors raised while editing or seeding a circuit.

use crate::core::{MachineId, ModelError, TableDefect};
use std::fmt;
use thiserror::Error;

/// Which side of a machine a port belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("Input"),
            Self::Output => f.write_str("Output"),
        }
    }
}

/// Configuration errors. A failed call leaves the circuit unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CircuitError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("machine already exists: {0}")]
    DuplicateMachine(String),

    #[error("machine doesn't exist: {0}")]
    MachineNotFound(String),

    #[error("{0} is not a machine of this circuit")]
    NotAMachine(MachineId),

    #[error(
        "{direction} port {port} is out of range in machine {machine}. \
         Number of {direction} ports in machine: {width}."
    )]
    PortOutOfRange {
        machine: String,
        direction: PortDirection,
        port: usize,
        width: usize,
    },

    #[error(
        "connection from machine {from_machine}, port {from_port} \
         to machine {to_machine}, port {to_port} doesn't exist"
    )]
    ConnectionNotFound {
        from_machine: String,
        from_port: usize,
        to_machine: String,
        to_port: usize,
    },

    #[error(
        "connection from machine {from_machine}, port {from_port} \
         to machine {to_machine}, port {to_port} already exists"
    )]
    DuplicateConnection {
        from_machine: String,
        from_port: usize,
        to_machine: String,
        to_port: usize,
    },

    #[error("not a state of this circuit: {0}")]
    NotAState(String),
}

impl From<TableDefect> for CircuitError {
    fn from(defect: TableDefect) -> Self {
        Self::Model(ModelError::InvalidTruthTable(defect))
    }
}
