//! Combinational logic elements.
//!
//! Every element kind implements the sealed [`LogicElement`] trait, and the
//! circuit stores elements as the [`Machine`] enum. Adding a new kind means
//! adding a variant here; the graph and the simulator only talk to the
//! trait.

use super::error::ModelError;
use super::truth_table::TruthTable;
use super::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a machine inside the circuit that registered it.
///
/// Ids are handed out in registration order and are never reused by the
/// same circuit, even after the machine is removed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(pub(crate) usize);

impl MachineId {
    /// Position of the machine in its circuit's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A validated machine name.
///
/// Names start with an ASCII letter or digit, followed by ASCII letters,
/// digits, `-` or `_`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MachineName(String);

impl MachineName {
    /// Validate `name`: an ASCII letter or digit followed by letters,
    /// digits, `-` or `_`.
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(name))
        } else {
            Err(ModelError::InvalidMachineName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MachineName {
    type Error = ModelError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl From<MachineName> for String {
    fn from(name: MachineName) -> Self {
        name.0
    }
}

impl fmt::Display for MachineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::SimpleMachine {}
    impl Sealed for super::Machine {}
}

/// Capabilities the circuit and simulator rely on.
///
/// This trait is sealed; element kinds are added as [`Machine`] variants
/// inside this crate.
pub trait LogicElement: sealed::Sealed {
    fn name(&self) -> &MachineName;

    fn input_width(&self) -> usize;

    fn output_width(&self) -> usize;

    /// Compute the full output vector for `inputs`.
    ///
    /// Returns `None` if `inputs` does not address a row, i.e. it has the
    /// wrong length or contains values other than `Low`/`High`.
    fn evaluate(&self, inputs: &[Value]) -> Option<Vec<Value>>;

    /// The value driven on output `port` for `inputs`.
    ///
    /// `Undefined` when evaluation fails or `port` is out of range.
    fn output_on_port(&self, inputs: &[Value], port: usize) -> Value {
        self.evaluate(inputs)
            .and_then(|outputs| outputs.get(port).copied())
            .unwrap_or(Value::Undefined)
    }

    /// A machine without inputs drives a constant.
    fn is_source(&self) -> bool {
        self.input_width() == 0
    }
}

/// A machine defined entirely by its truth table.
///
/// # Example
///
/// ```rust
/// use logic_sim::catalog;
/// use logic_sim::core::{LogicElement, SimpleMachine, Value};
///
/// let gate = SimpleMachine::new("nand-1", catalog::nand()).unwrap();
/// assert_eq!(gate.evaluate(&[Value::High, Value::High]), Some(vec![Value::Low]));
/// assert_eq!(gate.output_on_port(&[Value::Low, Value::High], 0), Value::High);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SimpleMachine {
    name: MachineName,
    table: TruthTable,
}

impl SimpleMachine {
    /// Create a machine called `name` backed by `table`.
    pub fn new(name: impl Into<String>, table: TruthTable) -> Result<Self, ModelError> {
        Ok(Self {
            name: MachineName::new(name)?,
            table,
        })
    }

    /// The table the machine evaluates.
    pub fn truth_table(&self) -> &TruthTable {
        &self.table
    }
}

impl LogicElement for SimpleMachine {
    fn name(&self) -> &MachineName {
        &self.name
    }

    fn input_width(&self) -> usize {
        self.table.input_width()
    }

    fn output_width(&self) -> usize {
        self.table.output_width()
    }

    fn evaluate(&self, inputs: &[Value]) -> Option<Vec<Value>> {
        self.table.lookup(inputs).map(<[Value]>::to_vec)
    }
}

/// Every element kind a circuit can hold.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Machine {
    Simple(SimpleMachine),
}

impl From<SimpleMachine> for Machine {
    fn from(machine: SimpleMachine) -> Self {
        Self::Simple(machine)
    }
}

impl LogicElement for Machine {
    fn name(&self) -> &MachineName {
        match self {
            Self::Simple(machine) => machine.name(),
        }
    }

    fn input_width(&self) -> usize {
        match self {
            Self::Simple(machine) => machine.input_width(),
        }
    }

    fn output_width(&self) -> usize {
        match self {
            Self::Simple(machine) => machine.output_width(),
        }
    }

    fn evaluate(&self, inputs: &[Value]) -> Option<Vec<Value>> {
        match self {
            Self::Simple(machine) => machine.evaluate(inputs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use Value::{High, Low, Undefined};

    fn check_gate(table: TruthTable, expected: [Value; 4]) {
        let gate = SimpleMachine::new("gate", table).unwrap();
        let combinations = [[Low, Low], [Low, High], [High, Low], [High, High]];
        for (inputs, output) in combinations.iter().zip(expected) {
            assert_eq!(gate.evaluate(inputs), Some(vec![output]), "inputs {inputs:?}");
        }
    }

    #[test]
    fn not_matches_textbook_table() {
        let gate = SimpleMachine::new("not", catalog::not()).unwrap();
        assert_eq!(gate.evaluate(&[Low]), Some(vec![High]));
        assert_eq!(gate.evaluate(&[High]), Some(vec![Low]));
    }

    #[test]
    fn two_input_gates_match_textbook_tables() {
        check_gate(catalog::and(), [Low, Low, Low, High]);
        check_gate(catalog::nand(), [High, High, High, Low]);
        check_gate(catalog::or(), [Low, High, High, High]);
        check_gate(catalog::nor(), [High, Low, Low, Low]);
        check_gate(catalog::xor(), [Low, High, High, Low]);
    }

    #[test]
    fn sources_are_constant() {
        let on = SimpleMachine::new("on", catalog::on()).unwrap();
        let off = SimpleMachine::new("off", catalog::off()).unwrap();
        assert_eq!(on.evaluate(&[]), Some(vec![High]));
        assert_eq!(off.evaluate(&[]), Some(vec![Low]));
        assert!(on.is_source());
        assert!(off.is_source());
    }

    #[test]
    fn custom_multi_output_table() {
        let half_adder = TruthTable::from_fn(2, |bits| {
            vec![Value::from(bits[0] ^ bits[1]), Value::from(bits[0] && bits[1])]
        })
        .unwrap();
        let machine = SimpleMachine::new("half_adder", half_adder).unwrap();

        assert_eq!(machine.input_width(), 2);
        assert_eq!(machine.output_width(), 2);
        assert_eq!(machine.evaluate(&[High, High]), Some(vec![Low, High]));
        assert_eq!(machine.output_on_port(&[High, Low], 0), High);
        assert_eq!(machine.output_on_port(&[High, Low], 1), Low);
    }

    #[test]
    fn undefined_inputs_do_not_match() {
        let gate = SimpleMachine::new("and", catalog::and()).unwrap();
        assert_eq!(gate.evaluate(&[High, Undefined]), None);
        assert_eq!(gate.output_on_port(&[High, Undefined], 0), Undefined);
    }

    #[test]
    fn out_of_range_port_reads_undefined() {
        let gate = SimpleMachine::new("not", catalog::not()).unwrap();
        assert_eq!(gate.output_on_port(&[Low], 3), Undefined);
    }

    #[test]
    fn widths_follow_table_shape() {
        let zero = SimpleMachine::new("sink", TruthTable::new([("0", vec![]), ("1", vec![])]).unwrap())
            .unwrap();
        assert_eq!(zero.input_width(), 1);
        assert_eq!(zero.output_width(), 0);

        let on = SimpleMachine::new("on", catalog::on()).unwrap();
        assert_eq!(on.input_width(), 0);
        assert_eq!(on.output_width(), 1);
    }

    #[test]
    fn name_validation() {
        for valid in ["a", "A1", "9lives", "not-2", "and_3", "x-_-y"] {
            assert!(MachineName::new(valid).is_ok(), "{valid} should be valid");
        }
        for invalid in ["", "-a", "_a", "a b", "a.b", "é", "a/b"] {
            assert_eq!(
                MachineName::new(invalid),
                Err(ModelError::InvalidMachineName(invalid.to_string()))
            );
        }
    }

    #[test]
    fn machine_enum_delegates() {
        let machine = Machine::from(SimpleMachine::new("xor", catalog::xor()).unwrap());
        assert_eq!(machine.name().as_str(), "xor");
        assert_eq!(machine.input_width(), 2);
        assert_eq!(machine.evaluate(&[High, Low]), Some(vec![High]));
        assert!(!machine.is_source());
    }
}
