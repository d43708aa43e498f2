//! Signal propagation.
//!
//! A run starts at every source machine and walks outbound connections
//! depth-first with an explicit work list, recomputing each visited machine
//! and recording a snapshot of the whole circuit after every step. Inputs are always resolved from
//! scratch through the inbound connections, never read back from the
//! working state, so a machine computes the same outputs every time it is
//! visited. After each snapshot the history decides whether the branch
//! below the current machine is worth walking; once a step leaves the state
//! unchanged (or the log starts repeating) that branch ends.

use super::{Circuit, CircuitError};
use crate::core::{Connection, LogicElement, MachineId, State, StateHistory, StopReason, Value};
use std::collections::HashSet;

/// Result of resolving a machine's inputs.
enum Resolution {
    /// The machine is not part of the circuit.
    Unresolvable,
    Inputs(Vec<Value>),
}

impl Circuit {
    /// Simulate from an all-`Undefined` state.
    ///
    /// Always terminates. Machines that are never reached from a source keep
    /// `Undefined` outputs; an oscillating circuit returns whatever snapshot
    /// was current when the oscillation was detected.
    pub fn simulate(&mut self) -> State {
        self.invalidate();
        self.run()
    }

    /// Simulate starting from `initial` instead of an all-`Undefined` state.
    ///
    /// `initial` must cover exactly the machines of this circuit with
    /// matching output widths.
    pub fn simulate_from(&mut self, initial: &State) -> Result<State, CircuitError> {
        self.check_state(initial)?;
        self.invalidate();
        self.current_state = initial.clone();
        Ok(self.run())
    }

    fn check_state(&self, state: &State) -> Result<(), CircuitError> {
        if state.len() != self.len() {
            return Err(CircuitError::NotAState(format!(
                "state covers {} machines, circuit has {}",
                state.len(),
                self.len()
            )));
        }
        for entry in state.entries() {
            let machine = self.machine_by_id(entry.id).ok_or_else(|| {
                CircuitError::NotAState(format!("unknown machine {} ({})", entry.name, entry.id))
            })?;
            if machine.name() != entry.name {
                return Err(CircuitError::NotAState(format!(
                    "{} is named {} in the circuit, {} in the state",
                    entry.id,
                    machine.name(),
                    entry.name
                )));
            }
            if machine.output_width() != entry.outputs.len() {
                return Err(CircuitError::NotAState(format!(
                    "{} has {} outputs, state holds {}",
                    entry.name,
                    machine.output_width(),
                    entry.outputs.len()
                )));
            }
        }
        Ok(())
    }

    fn run(&mut self) -> State {
        self.history = StateHistory::new();

        let sources: Vec<MachineId> = self
            .machines()
            .filter(|(_, machine)| machine.is_source())
            .map(|(id, _)| id)
            .collect();
        log::debug!(
            "simulating {} machines from {} sources",
            self.len(),
            sources.len()
        );

        // Depth-first work list; sinks are pushed in reverse so they are
        // visited in connection order.
        let mut pending: Vec<MachineId> = sources.into_iter().rev().collect();
        let mut stop = None;
        while let Some(id) = pending.pop() {
            if let Some(sinks) = self.step(id, &mut stop) {
                pending.extend(sinks.into_iter().rev());
            }
        }

        match stop {
            Some(StopReason::Stable) => log::debug!(
                "settled after {} snapshots",
                self.history.len()
            ),
            Some(StopReason::Cyclic) => log::debug!(
                "oscillation detected after {} snapshots",
                self.history.len()
            ),
            None => log::debug!(
                "propagation exhausted after {} snapshots",
                self.history.len()
            ),
        }

        let last = self.history.last_state().cloned();
        match last {
            Some(state) => {
                self.current_state = state.clone();
                state
            }
            None => self.current_state.clone(),
        }
    }

    /// Recompute `id`, record the snapshot and return the machines to visit
    /// next, or `None` when the branch below `id` ends here.
    fn step(
        &mut self,
        id: MachineId,
        stop: &mut Option<StopReason>,
    ) -> Option<Vec<MachineId>> {
        let machine = self.machine_by_id(id)?;

        let outputs = match self.resolve_inputs(id) {
            Resolution::Unresolvable => vec![Value::Undefined; machine.output_width()],
            Resolution::Inputs(inputs) => {
                let inputs: Vec<Value> = inputs.into_iter().map(Value::or_low).collect();
                machine.evaluate(&inputs).unwrap_or_else(|| {
                    log::warn!("{} has no row for inputs {inputs:?}", machine.name());
                    vec![Value::Undefined; machine.output_width()]
                })
            }
        };
        let name = machine.name().clone();
        let sinks: Vec<MachineId> = self
            .outbound(id)
            .iter()
            .map(|connection| connection.sink().machine)
            .collect();

        log::trace!("step {}: {name} -> {outputs:?}", self.history.len());
        self.current_state.set_outputs(id, name, outputs);
        self.history.record(self.current_state.clone());

        if let Some(reason) = self.history.stop_reason() {
            *stop = Some(reason);
            return None;
        }
        Some(sinks)
    }

    /// Compute the input vector of `id` by evaluating its drivers.
    ///
    /// The walk is post-order over inbound connections. `chain` holds the
    /// machines on the current dependency chain; a machine that shows up
    /// again on its own chain is unresolvable and feeds `Undefined` to its
    /// consumer. Ports without a driver stay `Undefined`.
    fn resolve_inputs(&self, id: MachineId) -> Resolution {
        let Some(frame) = self.enter(id) else {
            return Resolution::Unresolvable;
        };
        let mut chain = HashSet::from([id]);
        let mut frames = vec![frame];

        loop {
            let Some(frame) = frames.last_mut() else {
                return Resolution::Unresolvable;
            };
            let inbound = self.inbound(frame.id);

            if let Some(connection) = inbound.get(frame.next) {
                let driver = connection.source().machine;
                let entered = if chain.contains(&driver) {
                    None
                } else {
                    self.enter(driver)
                };
                match entered {
                    Some(child) => {
                        chain.insert(driver);
                        frames.push(child);
                    }
                    None => frame.accept(connection, Value::Undefined),
                }
                continue;
            }

            // Every driver of the top frame is resolved.
            let Some(done) = frames.pop() else {
                return Resolution::Unresolvable;
            };
            chain.remove(&done.id);
            let Some(consumer) = frames.last_mut() else {
                return Resolution::Inputs(done.inputs);
            };

            let driver_inputs: Vec<Value> = done.inputs.into_iter().map(Value::or_low).collect();
            let inbound = self.inbound(consumer.id);
            if let Some(connection) = inbound.get(consumer.next) {
                let value = self
                    .machine_by_id(done.id)
                    .map_or(Value::Undefined, |driver| {
                        driver.output_on_port(&driver_inputs, connection.source().port.index())
                    });
                consumer.accept(connection, value);
            }
        }
    }

    fn enter(&self, id: MachineId) -> Option<Frame> {
        let machine = self.machine_by_id(id)?;
        Some(Frame {
            id,
            inputs: vec![Value::Undefined; machine.input_width()],
            next: 0,
        })
    }
}

/// A machine whose inputs are being resolved.
struct Frame {
    id: MachineId,
    inputs: Vec<Value>,
    /// Index of the next inbound connection to resolve
    next: usize,
}

impl Frame {
    fn accept(&mut self, connection: &Connection, value: Value) {
        if let Some(input) = self.inputs.get_mut(connection.sink().port.index()) {
            *input = value;
        }
        self.next += 1;
    }
}
