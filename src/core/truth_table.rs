//! Total truth tables backing combinational machines.

use super::error::TableDefect;
use super::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A validated, total mapping from input bit strings to output vectors.
///
/// Keys are strings of `'0'`/`'1'`, one character per input port in port
/// order. Every one of the `2^L` keys must be present and every row must
/// have the same output width. A table with the single key `""` describes a
/// constant source.
///
/// # Example
///
/// ```rust
/// use logic_sim::core::{TruthTable, Value};
///
/// let buffer = TruthTable::new([
///     ("0", vec![Value::Low]),
///     ("1", vec![Value::High]),
/// ])
/// .unwrap();
///
/// assert_eq!(buffer.input_width(), 1);
/// assert_eq!(buffer.output_width(), 1);
/// assert_eq!(buffer.lookup(&[Value::High]), Some(&[Value::High][..]));
/// assert_eq!(buffer.lookup(&[Value::Undefined]), None);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<Value>>",
    into = "BTreeMap<String, Vec<Value>>"
)]
pub struct TruthTable {
    rows: BTreeMap<String, Vec<Value>>,
    /// Row outputs indexed by the key read as a binary number
    by_index: Vec<Vec<Value>>,
    input_width: usize,
    output_width: usize,
}

impl TruthTable {
    /// Validate `rows` and build a table from them.
    pub fn new<I, K>(rows: I) -> Result<Self, TableDefect>
    where
        I: IntoIterator<Item = (K, Vec<Value>)>,
        K: Into<String>,
    {
        let mut table = BTreeMap::new();
        for (key, outputs) in rows {
            let key = key.into();
            if table.contains_key(&key) {
                return Err(TableDefect::DuplicateKey { key });
            }
            table.insert(key, outputs);
        }
        Self::validate(table)
    }

    /// Build a table from rows using `Some(true)` for HIGH, `Some(false)`
    /// for LOW and `None` for UNDEFINED.
    pub fn from_levels<I, K>(rows: I) -> Result<Self, TableDefect>
    where
        I: IntoIterator<Item = (K, Vec<Option<bool>>)>,
        K: Into<String>,
    {
        Self::new(rows.into_iter().map(|(key, levels)| {
            (key, levels.into_iter().map(Value::from).collect())
        }))
    }

    /// Build a table over `input_width` inputs by evaluating `f` on every
    /// combination. Bits are passed in port order.
    pub fn from_fn<F>(input_width: usize, mut f: F) -> Result<Self, TableDefect>
    where
        F: FnMut(&[bool]) -> Vec<Value>,
    {
        let combinations = row_count(input_width).ok_or(TableDefect::Incomplete {
            width: input_width,
            expected: usize::MAX,
            found: 0,
        })?;

        let mut rows = BTreeMap::new();
        let mut bits = vec![false; input_width];
        for combination in 0..combinations {
            for (position, bit) in bits.iter_mut().enumerate() {
                *bit = (combination >> (input_width - 1 - position)) & 1 == 1;
            }
            let key: String = bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect();
            rows.insert(key, f(&bits));
        }
        Self::validate(rows)
    }

    fn validate(rows: BTreeMap<String, Vec<Value>>) -> Result<Self, TableDefect> {
        let Some((first_key, first_outputs)) = rows.iter().next() else {
            return Err(TableDefect::Empty);
        };
        let input_width = first_key.len();
        let output_width = first_outputs.len();

        for (key, outputs) in &rows {
            if !key.chars().all(|c| c == '0' || c == '1') {
                return Err(TableDefect::NonBinaryKey { key: key.clone() });
            }
            if key.len() != input_width {
                return Err(TableDefect::KeyLength {
                    key: key.clone(),
                    expected: input_width,
                    found: key.len(),
                });
            }
            if outputs.len() != output_width {
                return Err(TableDefect::OutputWidth {
                    key: key.clone(),
                    expected: output_width,
                    found: outputs.len(),
                });
            }
            if outputs.contains(&Value::Disconnected) {
                return Err(TableDefect::DisallowedValue { key: key.clone() });
            }
        }

        // Keys are distinct and well-formed, so the count alone decides totality.
        let expected = row_count(input_width);
        if expected != Some(rows.len()) {
            return Err(TableDefect::Incomplete {
                width: input_width,
                expected: expected.unwrap_or(usize::MAX),
                found: rows.len(),
            });
        }

        // Keys of equal length sort in numeric order.
        let by_index = rows.values().cloned().collect();
        Ok(Self {
            rows,
            by_index,
            input_width,
            output_width,
        })
    }

    pub fn input_width(&self) -> usize {
        self.input_width
    }

    pub fn output_width(&self) -> usize {
        self.output_width
    }

    /// Look up the row addressed by `inputs`.
    ///
    /// Returns `None` for vectors of the wrong length or containing anything
    /// other than `Low`/`High`.
    pub fn lookup(&self, inputs: &[Value]) -> Option<&[Value]> {
        if inputs.len() != self.input_width {
            return None;
        }
        let mut index = 0usize;
        for value in inputs {
            index = (index << 1) | usize::from(value.bit()?);
        }
        self.by_index.get(index).map(Vec::as_slice)
    }

    /// Iterate over `(key, outputs)` rows in key order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.rows
            .iter()
            .map(|(key, outputs)| (key.as_str(), outputs.as_slice()))
    }
}

fn row_count(input_width: usize) -> Option<usize> {
    u32::try_from(input_width)
        .ok()
        .and_then(|width| 1usize.checked_shl(width))
}

impl TryFrom<BTreeMap<String, Vec<Value>>> for TruthTable {
    type Error = TableDefect;

    fn try_from(rows: BTreeMap<String, Vec<Value>>) -> Result<Self, Self::Error> {
        Self::validate(rows)
    }
}

impl From<TruthTable> for BTreeMap<String, Vec<Value>> {
    fn from(table: TruthTable) -> Self {
        table.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Value::{High, Low, Undefined};

    #[test]
    fn accepts_total_table() {
        let table = TruthTable::new([
            ("00", vec![Low, Low]),
            ("01", vec![High, Low]),
            ("10", vec![High, Low]),
            ("11", vec![Low, High]),
        ])
        .unwrap();

        assert_eq!(table.input_width(), 2);
        assert_eq!(table.output_width(), 2);
        assert_eq!(table.lookup(&[High, High]), Some(&[Low, High][..]));
    }

    #[test]
    fn accepts_constant_source() {
        let table = TruthTable::new([("", vec![High])]).unwrap();
        assert_eq!(table.input_width(), 0);
        assert_eq!(table.lookup(&[]), Some(&[High][..]));
    }

    #[test]
    fn accepts_zero_output_width() {
        let table = TruthTable::new([("0", vec![]), ("1", vec![])]).unwrap();
        assert_eq!(table.output_width(), 0);
    }

    #[test]
    fn accepts_undefined_outputs() {
        let table = TruthTable::from_levels([("0", vec![None]), ("1", vec![Some(true)])]).unwrap();
        assert_eq!(table.lookup(&[Low]), Some(&[Undefined][..]));
    }

    #[test]
    fn rejects_empty_table() {
        let rows: Vec<(&str, Vec<Value>)> = Vec::new();
        assert_eq!(TruthTable::new(rows), Err(TableDefect::Empty));
    }

    #[test]
    fn rejects_non_binary_key() {
        let result = TruthTable::new([("0", vec![Low]), ("2", vec![High])]);
        assert!(matches!(result, Err(TableDefect::NonBinaryKey { .. })));
    }

    #[test]
    fn rejects_incomplete_table() {
        let result = TruthTable::new([
            ("00", vec![Low]),
            ("01", vec![Low]),
            ("10", vec![Low]),
        ]);
        assert!(matches!(
            result,
            Err(TableDefect::Incomplete {
                width: 2,
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn rejects_mixed_key_lengths() {
        let result = TruthTable::new([("0", vec![Low]), ("1", vec![Low]), ("00", vec![Low])]);
        assert!(matches!(result, Err(TableDefect::KeyLength { .. })));
    }

    #[test]
    fn rejects_variable_length_outputs() {
        let result = TruthTable::new([("0", vec![Low]), ("1", vec![Low, High])]);
        assert!(matches!(result, Err(TableDefect::OutputWidth { .. })));
    }

    #[test]
    fn rejects_disconnected_outputs() {
        let result = TruthTable::new([("0", vec![Low]), ("1", vec![Value::Disconnected])]);
        assert!(matches!(result, Err(TableDefect::DisallowedValue { .. })));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let result = TruthTable::new([("0", vec![Low]), ("0", vec![High]), ("1", vec![Low])]);
        assert!(matches!(result, Err(TableDefect::DuplicateKey { .. })));
    }

    #[test]
    fn lookup_rejects_malformed_inputs() {
        let table = TruthTable::new([("0", vec![High]), ("1", vec![Low])]).unwrap();
        assert_eq!(table.lookup(&[Undefined]), None);
        assert_eq!(table.lookup(&[Low, Low]), None);
        assert_eq!(table.lookup(&[]), None);
    }

    #[test]
    fn from_fn_enumerates_in_port_order() {
        let table = TruthTable::from_fn(2, |bits| vec![Value::from(bits[0] && !bits[1])]).unwrap();
        assert_eq!(table.lookup(&[High, Low]), Some(&[High][..]));
        assert_eq!(table.lookup(&[Low, High]), Some(&[Low][..]));
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"{"0":["Low"]}"#;
        assert!(serde_json::from_str::<TruthTable>(json).is_err());

        let json = r#"{"0":["High"],"1":["Low"]}"#;
        let table: TruthTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.lookup(&[Low]), Some(&[High][..]));
    }
}
