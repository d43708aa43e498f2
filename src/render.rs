//! Human-readable and JSON renderings of states and histories.
//!
//! `State` renders one line per machine (`name output: [HIGH, LOW]`),
//! `StateHistory` renders every snapshot under a `State <step>:` header.

use crate::core::{State, StateHistory, Value};
use std::fmt;

struct Outputs<'a>(&'a [Value]);

impl fmt::Display for Outputs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.entries() {
            writeln!(f, "{} output: {}", entry.name, Outputs(entry.outputs))?;
        }
        Ok(())
    }
}

impl fmt::Display for StateHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for snapshot in self.snapshots() {
            writeln!(f, "State {}:", snapshot.step)?;
            write!(f, "{}", snapshot.state)?;
        }
        Ok(())
    }
}

impl State {
    /// Render as a JSON array of `{id, name, outputs}` entries.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl StateHistory {
    /// Render every snapshot, including its timestamp, as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
