//! The circuit graph and its editing API.
//!
//! A [`Circuit`] owns its machines in an arena indexed by [`MachineId`] and
//! keeps, per machine, the list of inbound and outbound connections. Names
//! are only a lookup key. Every successful edit throws away the state and
//! history cached from the previous simulation.

mod error;
mod simulate;

pub use error::{CircuitError, PortDirection};

use crate::core::{
    Connection, LogicElement, Machine, MachineId, Port, SimpleMachine, State, StateHistory,
    TruthTable,
};
use std::collections::HashMap;

#[derive(Clone, Debug)]
struct Slot {
    machine: Machine,
    /// Connections driving this machine's input ports
    inputs: Vec<Connection>,
    /// Connections driven by this machine's output ports
    outputs: Vec<Connection>,
}

/// A network of machines wired together by connections.
///
/// # Example
///
/// ```rust
/// use logic_sim::catalog::{self, A, B};
/// use logic_sim::circuit::Circuit;
/// use logic_sim::core::Value;
///
/// let mut circuit = Circuit::new();
/// circuit.add_machine("high", catalog::on())?;
/// circuit.add_machine("low", catalog::off())?;
/// circuit.add_machine("xor", catalog::xor())?;
/// circuit.add_connection("high", A, "xor", A)?;
/// circuit.add_connection("low", A, "xor", B)?;
///
/// let state = circuit.simulate();
/// assert_eq!(state.outputs("xor"), Some(&[Value::High][..]));
/// # Ok::<(), logic_sim::circuit::CircuitError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Circuit {
    slots: Vec<Option<Slot>>,
    names: HashMap<String, MachineId>,
    current_state: State,
    history: StateHistory,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a truth-table machine called `name`.
    pub fn add_machine(
        &mut self,
        name: &str,
        table: TruthTable,
    ) -> Result<MachineId, CircuitError> {
        if self.names.contains_key(name) {
            return Err(CircuitError::DuplicateMachine(name.to_string()));
        }
        let machine = SimpleMachine::new(name, table)?;
        self.add_element(machine.into())
    }

    /// Add an already constructed element.
    pub fn add_element(&mut self, machine: Machine) -> Result<MachineId, CircuitError> {
        let name = machine.name().as_str().to_string();
        if self.names.contains_key(&name) {
            return Err(CircuitError::DuplicateMachine(name));
        }

        let id = MachineId(self.slots.len());
        log::debug!(
            "adding machine {name} as {id} ({} in, {} out)",
            machine.input_width(),
            machine.output_width()
        );
        self.slots.push(Some(Slot {
            machine,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }));
        self.names.insert(name, id);
        self.invalidate();
        Ok(id)
    }

    /// Remove the machine called `name` together with every connection
    /// that touches it.
    pub fn remove_machine(&mut self, name: &str) -> Result<Machine, CircuitError> {
        let id = self.require(name)?;
        let slot = self.slots[id.0]
            .take()
            .ok_or_else(|| CircuitError::MachineNotFound(name.to_string()))?;
        self.names.remove(name);

        for connection in slot.inputs.iter().chain(&slot.outputs) {
            let source = connection.source().machine;
            let sink = connection.sink().machine;
            if let Some(other) = self.slot_mut(source) {
                other.outputs.retain(|c| c != connection);
            }
            if let Some(other) = self.slot_mut(sink) {
                other.inputs.retain(|c| c != connection);
            }
        }

        log::debug!(
            "removed machine {name} ({id}) and {} connections",
            slot.inputs.len() + slot.outputs.len()
        );
        self.invalidate();
        Ok(slot.machine)
    }

    /// Wire output `source_port` of `source` to input `sink_port` of `sink`.
    pub fn add_connection(
        &mut self,
        source: &str,
        source_port: usize,
        sink: &str,
        sink_port: usize,
    ) -> Result<(), CircuitError> {
        let source_id = self.require(source)?;
        let sink_id = self.require(sink)?;
        self.connect(source_id, source_port, sink_id, sink_port)
    }

    /// Like [`Circuit::add_connection`], addressing machines by id.
    pub fn connect(
        &mut self,
        source: MachineId,
        source_port: usize,
        sink: MachineId,
        sink_port: usize,
    ) -> Result<(), CircuitError> {
        let source_machine = self.live(source)?;
        let sink_machine = self.live(sink)?;

        if source_port >= source_machine.output_width() {
            return Err(CircuitError::PortOutOfRange {
                machine: source_machine.name().to_string(),
                direction: PortDirection::Output,
                port: source_port,
                width: source_machine.output_width(),
            });
        }
        if sink_port >= sink_machine.input_width() {
            return Err(CircuitError::PortOutOfRange {
                machine: sink_machine.name().to_string(),
                direction: PortDirection::Input,
                port: sink_port,
                width: sink_machine.input_width(),
            });
        }

        let connection = Connection::new(source, Port(source_port), sink, Port(sink_port));
        if self.find_connection(connection) {
            return Err(CircuitError::DuplicateConnection {
                from_machine: source_machine.name().to_string(),
                from_port: source_port,
                to_machine: sink_machine.name().to_string(),
                to_port: sink_port,
            });
        }

        log::debug!(
            "connecting {}:{source_port} -> {}:{sink_port}",
            source_machine.name(),
            sink_machine.name()
        );
        if let Some(slot) = self.slot_mut(source) {
            slot.outputs.push(connection);
        }
        if let Some(slot) = self.slot_mut(sink) {
            slot.inputs.push(connection);
        }
        self.invalidate();
        Ok(())
    }

    /// Remove the connection with exactly these endpoints.
    pub fn remove_connection(
        &mut self,
        source: &str,
        source_port: usize,
        sink: &str,
        sink_port: usize,
    ) -> Result<(), CircuitError> {
        let not_found = || CircuitError::ConnectionNotFound {
            from_machine: source.to_string(),
            from_port: source_port,
            to_machine: sink.to_string(),
            to_port: sink_port,
        };
        let (Some(source_id), Some(sink_id)) = (self.machine_id(source), self.machine_id(sink))
        else {
            return Err(not_found());
        };

        let connection = Connection::new(source_id, Port(source_port), sink_id, Port(sink_port));
        if !self.find_connection(connection) {
            return Err(not_found());
        }

        if let Some(slot) = self.slot_mut(source_id) {
            slot.outputs.retain(|c| *c != connection);
        }
        if let Some(slot) = self.slot_mut(sink_id) {
            slot.inputs.retain(|c| *c != connection);
        }
        log::debug!("disconnected {source}:{source_port} -> {sink}:{sink_port}");
        self.invalidate();
        Ok(())
    }

    /// The id assigned to the machine called `name`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use logic_sim::catalog;
    /// use logic_sim::circuit::Circuit;
    ///
    /// let mut circuit = Circuit::new();
    /// let id = circuit.add_machine("on", catalog::on()).unwrap();
    /// assert_eq!(circuit.machine_id("on"), Some(id));
    ///
    /// circuit.remove_machine("on").unwrap();
    /// assert_eq!(circuit.machine_id("on"), None);
    /// ```
    pub fn machine_id(&self, name: &str) -> Option<MachineId> {
        self.names.get(name).copied()
    }

    /// The machine called `name`.
    pub fn machine(&self, name: &str) -> Option<&Machine> {
        self.machine_id(name).and_then(|id| self.machine_by_id(id))
    }

    /// The machine with id `id`, if it is still part of the circuit.
    pub fn machine_by_id(&self, id: MachineId) -> Option<&Machine> {
        self.slot(id).map(|slot| &slot.machine)
    }

    /// Live machines in registration order.
    pub fn machines(&self) -> impl Iterator<Item = (MachineId, &Machine)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|slot| (MachineId(index), &slot.machine))
        })
    }

    /// Every connection, grouped by source machine in registration order.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.slots
            .iter()
            .flatten()
            .flat_map(|slot| slot.outputs.iter().copied())
    }

    /// Connections driving the inputs of `id`, in insertion order.
    pub fn inbound(&self, id: MachineId) -> &[Connection] {
        self.slot(id).map(|slot| slot.inputs.as_slice()).unwrap_or(&[])
    }

    /// Connections driven by the outputs of `id`, in insertion order.
    pub fn outbound(&self, id: MachineId) -> &[Connection] {
        self.slot(id).map(|slot| slot.outputs.as_slice()).unwrap_or(&[])
    }

    /// True when a connection with exactly these endpoints exists.
    pub fn has_connection(
        &self,
        source: &str,
        source_port: usize,
        sink: &str,
        sink_port: usize,
    ) -> bool {
        match (self.machine_id(source), self.machine_id(sink)) {
            (Some(source), Some(sink)) => self.find_connection(Connection::new(
                source,
                Port(source_port),
                sink,
                Port(sink_port),
            )),
            _ => false,
        }
    }

    /// Number of machines in the circuit.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the circuit holds no machines.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The working state: the result of the last simulation, or all
    /// `Undefined` after an edit.
    pub fn state(&self) -> &State {
        &self.current_state
    }

    /// Snapshots recorded by the last simulation. Empty after an edit.
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    fn slot(&self, id: MachineId) -> Option<&Slot> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: MachineId) -> Option<&mut Slot> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn require(&self, name: &str) -> Result<MachineId, CircuitError> {
        self.machine_id(name)
            .ok_or_else(|| CircuitError::MachineNotFound(name.to_string()))
    }

    fn live(&self, id: MachineId) -> Result<&Machine, CircuitError> {
        self.machine_by_id(id).ok_or(CircuitError::NotAMachine(id))
    }

    fn find_connection(&self, connection: Connection) -> bool {
        self.outbound(connection.source().machine)
            .contains(&connection)
    }

    fn invalidate(&mut self) {
        self.history = StateHistory::new();
        self.current_state = State::undefined(self.machines());
    }
}
