//! Named truth tables for the standard gates and constant sources.
//!
//! Gates take their inputs on ports [`A`] and [`B`] and drive a single
//! output on port [`A`].
//!
//! # Example
//!
//! ```rust
//! use logic_sim::catalog;
//! use logic_sim::core::Value;
//!
//! let xor = catalog::xor();
//! assert_eq!(xor.lookup(&[Value::High, Value::Low]), Some(&[Value::High][..]));
//! ```

use crate::core::{TruthTable, Value};

pub const A: usize = 0;
pub const B: usize = 1;
pub const C: usize = 2;
pub const D: usize = 3;
pub const E: usize = 4;
pub const F: usize = 5;
pub const G: usize = 6;
pub const H: usize = 7;

fn gate(input_width: usize, f: impl Fn(&[bool]) -> bool) -> TruthTable {
    TruthTable::from_fn(input_width, |bits| vec![Value::from(f(bits))])
        .expect("catalog tables are total by construction")
}

pub fn not() -> TruthTable {
    gate(1, |bits| !bits[0])
}

pub fn and() -> TruthTable {
    gate(2, |bits| bits[0] && bits[1])
}

pub fn nand() -> TruthTable {
    gate(2, |bits| !(bits[0] && bits[1]))
}

pub fn or() -> TruthTable {
    gate(2, |bits| bits[0] || bits[1])
}

pub fn nor() -> TruthTable {
    gate(2, |bits| !(bits[0] || bits[1]))
}

pub fn xor() -> TruthTable {
    gate(2, |bits| bits[0] != bits[1])
}

/// Constant HIGH source.
pub fn on() -> TruthTable {
    gate(0, |_| true)
}

/// Constant LOW source.
pub fn off() -> TruthTable {
    gate(0, |_| false)
}
