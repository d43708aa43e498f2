//! Builder API for ergonomic circuit construction.
//!
//! This module provides a fluent builder and a table macro for declaring
//! circuits up front instead of issuing edits one at a time.

mod circuit;
pub mod macros;

pub use circuit::CircuitBuilder;
