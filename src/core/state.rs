//! Snapshots of every machine's outputs.
//!
//! A [`State`] keeps the machine layout (ids, names and output widths)
//! behind an `Arc` and the output values in one flat vector, so the
//! per-step clones taken by the simulator copy only the values. A running
//! fingerprint of the values lets unequal states be told apart without a
//! full comparison.

use super::machine::{LogicElement, MachineId, MachineName};
use super::value::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;

/// Borrowed view of one machine's outputs inside a [`State`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct StateEntry<'a> {
    pub id: MachineId,
    pub name: &'a MachineName,
    pub outputs: &'a [Value],
}

#[derive(Deserialize)]
struct EntryRecord {
    id: MachineId,
    name: MachineName,
    outputs: Vec<Value>,
}

/// Which machines a state covers and where their outputs live.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
struct Layout {
    ids: Vec<MachineId>,
    names: Vec<MachineName>,
    /// `ends[i]` is one past the last value of `ids[i]`
    ends: Vec<usize>,
}

impl Layout {
    fn start(&self, index: usize) -> usize {
        index
            .checked_sub(1)
            .and_then(|previous| self.ends.get(previous).copied())
            .unwrap_or(0)
    }

    fn range(&self, index: usize) -> Range<usize> {
        self.start(index)..self.ends[index]
    }
}

fn entry_fingerprint(id: MachineId, outputs: &[Value]) -> u64 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    outputs.hash(&mut hasher);
    hasher.finish()
}

/// The output vector of every machine in a circuit at one point in time.
///
/// Entries are ordered by machine id, which is registration order. Two
/// states are equal when they cover the same machines and every output
/// vector matches element-wise. Clones are deep for the values; the
/// layout is shared until one side changes it.
///
/// # Example
///
/// ```rust
/// use logic_sim::catalog;
/// use logic_sim::circuit::Circuit;
/// use logic_sim::core::Value;
///
/// let mut circuit = Circuit::new();
/// circuit.add_machine("on", catalog::on()).unwrap();
/// circuit.add_machine("not", catalog::not()).unwrap();
/// circuit.add_connection("on", catalog::A, "not", catalog::A).unwrap();
///
/// let state = circuit.simulate();
/// assert_eq!(state.outputs("not"), Some(&[Value::Low][..]));
/// assert_eq!(state.output("on", 0).unwrap(), Value::High);
/// ```
#[derive(Clone, Debug, Default)]
pub struct State {
    layout: Arc<Layout>,
    values: Vec<Value>,
    /// XOR of the per-entry fingerprints
    fingerprint: u64,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
            && self.values == other.values
            && self.layout == other.layout
    }
}

impl Eq for State {}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries())
    }
}

impl<'de> Deserialize<'de> for State {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut records = Vec::<EntryRecord>::deserialize(deserializer)?;
        records.sort_by_key(|record| record.id);
        records.dedup_by_key(|record| record.id);

        let mut state = Self::new();
        for record in records {
            state.set_outputs(record.id, record.name, record.outputs);
        }
        Ok(state)
    }
}

/// Why a [`State`] lookup failed.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum StateLookupError {
    #[error("{0} not present in state")]
    MachineNotInState(String),

    #[error("output port {port} is out of range in machine {machine}; it has {width} output ports")]
    PortOutOfRange {
        machine: String,
        port: usize,
        width: usize,
    },
}

impl State {
    /// A state with no machines.
    pub fn new() -> Self {
        Self::default()
    }

    /// A state holding `Undefined` on every output of every machine.
    pub fn undefined<'a, M, I>(machines: I) -> Self
    where
        M: LogicElement + 'a,
        I: IntoIterator<Item = (MachineId, &'a M)>,
    {
        let mut state = Self::new();
        for (id, machine) in machines {
            state.set_outputs(
                id,
                machine.name().clone(),
                vec![Value::Undefined; machine.output_width()],
            );
        }
        state
    }

    fn position(&self, id: MachineId) -> Result<usize, usize> {
        self.layout.ids.binary_search(&id)
    }

    fn entry(&self, index: usize) -> StateEntry<'_> {
        StateEntry {
            id: self.layout.ids[index],
            name: &self.layout.names[index],
            outputs: &self.values[self.layout.range(index)],
        }
    }

    fn insert_entry(&mut self, index: usize, id: MachineId, name: MachineName, outputs: &[Value]) {
        let start = self.layout.start(index);
        let layout = Arc::make_mut(&mut self.layout);
        layout.ids.insert(index, id);
        layout.names.insert(index, name);
        layout.ends.insert(index, start);
        for end in &mut layout.ends[index..] {
            *end += outputs.len();
        }
        self.values.splice(start..start, outputs.iter().copied());
        self.fingerprint ^= entry_fingerprint(id, outputs);
    }

    fn remove_entry(&mut self, index: usize) -> MachineName {
        let range = self.layout.range(index);
        let id = self.layout.ids[index];
        self.fingerprint ^= entry_fingerprint(id, &self.values[range.clone()]);
        self.values.drain(range.clone());

        let layout = Arc::make_mut(&mut self.layout);
        layout.ids.remove(index);
        layout.ends.remove(index);
        for end in &mut layout.ends[index..] {
            *end -= range.len();
        }
        layout.names.remove(index)
    }

    /// Replace (or insert) the outputs recorded for `id`.
    ///
    /// The name is only used when `id` is new to this state.
    pub fn set_outputs(&mut self, id: MachineId, name: MachineName, outputs: Vec<Value>) {
        match self.position(id) {
            Ok(_) => {
                self.update_outputs(id, outputs);
            }
            Err(index) => self.insert_entry(index, id, name, &outputs),
        }
    }

    /// Update the outputs of a machine already present in the state.
    ///
    /// Returns `false` if `id` is not part of this state.
    pub fn update_outputs(&mut self, id: MachineId, outputs: Vec<Value>) -> bool {
        let Ok(index) = self.position(id) else {
            return false;
        };
        let range = self.layout.range(index);
        if range.len() == outputs.len() {
            self.fingerprint ^= entry_fingerprint(id, &self.values[range.clone()])
                ^ entry_fingerprint(id, &outputs);
            self.values[range].copy_from_slice(&outputs);
        } else {
            let name = self.remove_entry(index);
            self.insert_entry(index, id, name, &outputs);
        }
        true
    }

    /// The entry recorded for `id`.
    pub fn get(&self, id: MachineId) -> Option<StateEntry<'_>> {
        self.position(id).ok().map(|index| self.entry(index))
    }

    /// Outputs of the machine with id `id`.
    pub fn outputs_of(&self, id: MachineId) -> Option<&[Value]> {
        self.position(id)
            .ok()
            .map(|index| &self.values[self.layout.range(index)])
    }

    /// Outputs of the machine called `name`.
    pub fn outputs(&self, name: &str) -> Option<&[Value]> {
        self.layout
            .names
            .iter()
            .position(|candidate| candidate.as_str() == name)
            .map(|index| &self.values[self.layout.range(index)])
    }

    /// The value on output `port` of the machine called `name`.
    pub fn output(&self, name: &str, port: usize) -> Result<Value, StateLookupError> {
        let outputs = self
            .outputs(name)
            .ok_or_else(|| StateLookupError::MachineNotInState(name.to_string()))?;
        outputs
            .get(port)
            .copied()
            .ok_or_else(|| StateLookupError::PortOutOfRange {
                machine: name.to_string(),
                port,
                width: outputs.len(),
            })
    }

    /// Every entry, ordered by machine id.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = StateEntry<'_>> + '_ {
        (0..self.len()).map(move |index| self.entry(index))
    }

    /// Number of machines covered.
    pub fn len(&self) -> usize {
        self.layout.ids.len()
    }

    /// True when the state covers no machines.
    pub fn is_empty(&self) -> bool {
        self.layout.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::core::SimpleMachine;

    fn name(text: &str) -> MachineName {
        MachineName::new(text).unwrap()
    }

    fn two_machine_state() -> State {
        let on = SimpleMachine::new("on", catalog::on()).unwrap();
        let and = SimpleMachine::new("and", catalog::and()).unwrap();
        State::undefined([(MachineId(0), &on), (MachineId(1), &and)])
    }

    #[test]
    fn undefined_state_covers_every_output() {
        let state = two_machine_state();
        assert_eq!(state.len(), 2);
        assert_eq!(state.outputs("on"), Some(&[Value::Undefined][..]));
        assert_eq!(state.outputs("and"), Some(&[Value::Undefined][..]));
    }

    #[test]
    fn set_outputs_replaces_existing_entry() {
        let mut state = two_machine_state();
        state.set_outputs(MachineId(1), name("and"), vec![Value::High]);
        assert_eq!(state.len(), 2);
        assert_eq!(state.outputs_of(MachineId(1)), Some(&[Value::High][..]));
    }

    #[test]
    fn entries_stay_ordered_by_id() {
        let mut state = State::new();
        state.set_outputs(MachineId(5), name("late"), vec![]);
        state.set_outputs(MachineId(1), name("early"), vec![]);
        let ids: Vec<_> = state.entries().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![MachineId(1), MachineId(5)]);
    }

    #[test]
    fn update_outputs_ignores_unknown_machine() {
        let mut state = two_machine_state();
        assert!(!state.update_outputs(MachineId(9), vec![Value::High]));
        assert!(state.update_outputs(MachineId(0), vec![Value::High]));
        assert_eq!(state.outputs("on"), Some(&[Value::High][..]));
    }

    #[test]
    fn output_reports_missing_machine_and_port() {
        let state = two_machine_state();
        assert_eq!(
            state.output("or", 0),
            Err(StateLookupError::MachineNotInState("or".to_string()))
        );
        assert!(matches!(
            state.output("on", 1),
            Err(StateLookupError::PortOutOfRange { port: 1, width: 1, .. })
        ));
        assert_eq!(state.output("on", 0), Ok(Value::Undefined));
    }

    #[test]
    fn equality_is_element_wise() {
        let first = two_machine_state();
        let mut second = first.clone();
        assert_eq!(first, second);

        second.update_outputs(MachineId(0), vec![Value::High]);
        assert_ne!(first, second);

        let mut third = first.clone();
        third.set_outputs(MachineId(2), name("extra"), vec![]);
        assert_ne!(first, third);
    }

    #[test]
    fn clone_is_independent() {
        let original = two_machine_state();
        let mut copy = original.clone();
        copy.update_outputs(MachineId(0), vec![Value::Low]);
        assert_eq!(original.outputs("on"), Some(&[Value::Undefined][..]));
    }

    #[test]
    fn width_change_moves_later_entries() {
        let mut state = two_machine_state();
        assert!(state.update_outputs(MachineId(0), vec![Value::High, Value::Low]));
        assert_eq!(state.outputs("on"), Some(&[Value::High, Value::Low][..]));
        assert_eq!(state.outputs("and"), Some(&[Value::Undefined][..]));

        state.set_outputs(MachineId(1), name("and"), vec![Value::Low]);
        assert_eq!(state.outputs_of(MachineId(1)), Some(&[Value::Low][..]));
    }

    #[test]
    fn equal_values_compare_equal_after_different_edits() {
        let mut first = two_machine_state();
        let mut second = two_machine_state();
        first.update_outputs(MachineId(0), vec![Value::High]);
        first.update_outputs(MachineId(0), vec![Value::Undefined]);
        second.update_outputs(MachineId(1), vec![Value::Low]);
        assert_ne!(first, second);
        second.update_outputs(MachineId(1), vec![Value::Undefined]);
        assert_eq!(first, second);
    }

    #[test]
    fn get_returns_borrowed_entry() {
        let state = two_machine_state();
        let entry = state.get(MachineId(1)).unwrap();
        assert_eq!(entry.name.as_str(), "and");
        assert_eq!(entry.outputs, &[Value::Undefined][..]);
        assert!(state.get(MachineId(7)).is_none());
    }

    #[test]
    fn state_serializes_correctly() {
        let state = two_machine_state();
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: State = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
        assert!(json.contains(r#""name":"and""#));
    }
}
