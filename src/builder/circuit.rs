//! Builder for constructing circuits.

use crate::circuit::{Circuit, CircuitError};
use crate::core::{TableDefect, TruthTable, Value};

#[derive(Clone, Debug)]
struct Wire {
    source: String,
    source_port: usize,
    sink: String,
    sink_port: usize,
}

/// Builder for declaring a circuit with a fluent API.
///
/// Nothing is validated until [`CircuitBuilder::build`], which adds all
/// machines in declaration order and then all connections, stopping at the
/// first error. Tables declared from raw rows are validated there too and
/// fail with `ModelError::InvalidTruthTable`.
///
/// # Example
///
/// ```rust
/// use logic_sim::builder::CircuitBuilder;
/// use logic_sim::catalog::{self, A, B};
/// use logic_sim::core::Value;
///
/// let mut circuit = CircuitBuilder::new()
///     .machine("x", catalog::on())
///     .machine("y", catalog::off())
///     .machine("nor", catalog::nor())
///     .connect("x", A, "nor", A)
///     .connect("y", A, "nor", B)
///     .build()
///     .unwrap();
///
/// let state = circuit.simulate();
/// assert_eq!(state.outputs("nor"), Some(&[Value::Low][..]));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CircuitBuilder {
    machines: Vec<(String, Result<TruthTable, TableDefect>)>,
    wires: Vec<Wire>,
}

impl CircuitBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a machine.
    pub fn machine(mut self, name: impl Into<String>, table: TruthTable) -> Self {
        self.machines.push((name.into(), Ok(table)));
        self
    }

    /// Declare a machine from raw truth table rows.
    pub fn machine_from_rows<I, K>(mut self, name: impl Into<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<Value>)>,
        K: Into<String>,
    {
        self.machines.push((name.into(), TruthTable::new(rows)));
        self
    }

    /// Declare several machines at once.
    pub fn machines<I, N>(mut self, machines: I) -> Self
    where
        I: IntoIterator<Item = (N, TruthTable)>,
        N: Into<String>,
    {
        self.machines
            .extend(machines.into_iter().map(|(name, table)| (name.into(), Ok(table))));
        self
    }

    /// Declare a connection from `source`'s output port to `sink`'s input
    /// port.
    pub fn connect(
        mut self,
        source: impl Into<String>,
        source_port: usize,
        sink: impl Into<String>,
        sink_port: usize,
    ) -> Self {
        self.wires.push(Wire {
            source: source.into(),
            source_port,
            sink: sink.into(),
            sink_port,
        });
        self
    }

    /// Build the circuit.
    /// Returns the first configuration error encountered.
    pub fn build(self) -> Result<Circuit, CircuitError> {
        let mut circuit = Circuit::new();
        for (name, table) in self.machines {
            circuit.add_machine(&name, table?)?;
        }
        for wire in self.wires {
            circuit.add_connection(&wire.source, wire.source_port, &wire.sink, wire.sink_port)?;
        }
        Ok(circuit)
    }
}
