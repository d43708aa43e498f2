//! Wires between machine ports.

use super::error::ModelError;
use super::machine::MachineId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an input or output line on a machine.
///
/// Port numbers arriving from outside the crate (a file, a UI, a script)
/// are often signed; `Port::try_from` on `i64`/`i32` is the checked
/// conversion for them and fails with [`ModelError::NotAPort`], which `?`
/// lifts into a `CircuitError`.
///
/// # Example
///
/// ```rust
/// use logic_sim::catalog;
/// use logic_sim::circuit::{Circuit, CircuitError};
/// use logic_sim::core::{ModelError, Port};
///
/// fn wire(circuit: &mut Circuit, from: i64, to: i64) -> Result<(), CircuitError> {
///     let from = Port::try_from(from)?;
///     let to = Port::try_from(to)?;
///     circuit.add_connection("on", from.index(), "not", to.index())
/// }
///
/// let mut circuit = Circuit::new();
/// circuit.add_machine("on", catalog::on())?;
/// circuit.add_machine("not", catalog::not())?;
///
/// assert_eq!(
///     wire(&mut circuit, -1, 0),
///     Err(CircuitError::Model(ModelError::NotAPort(-1)))
/// );
/// wire(&mut circuit, 0, 0)?;
/// assert!(circuit.has_connection("on", 0, "not", 0));
/// # Ok::<(), CircuitError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(pub usize);

impl Port {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for Port {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl TryFrom<i64> for Port {
    type Error = ModelError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        usize::try_from(raw)
            .map(Self)
            .map_err(|_| ModelError::NotAPort(raw))
    }
}

impl TryFrom<i32> for Port {
    type Error = ModelError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(raw))
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One end of a connection: a machine and one of its ports.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Endpoint {
    pub machine: MachineId,
    pub port: Port,
}

/// A directed wire from an output port to an input port.
///
/// The circuit keeps every connection twice, once in the source's outbound
/// list and once in the sink's inbound list; both copies compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Connection {
    source: Endpoint,
    sink: Endpoint,
}

impl Connection {
    pub fn new(
        source_machine: MachineId,
        source_port: Port,
        sink_machine: MachineId,
        sink_port: Port,
    ) -> Self {
        Self {
            source: Endpoint {
                machine: source_machine,
                port: source_port,
            },
            sink: Endpoint {
                machine: sink_machine,
                port: sink_port,
            },
        }
    }

    /// The driving side (an output port).
    /// The driving output port.
    pub fn source(&self) -> Endpoint {
        self.source
    }

    /// The driven side (an input port).
    /// The driven input port.
    pub fn sink(&self) -> Endpoint {
        self.sink
    }

    /// True when either end of the connection is on `machine`.
    pub fn touches(&self, machine: MachineId) -> bool {
        self.source.machine == machine || self.sink.machine == machine
    }
}
