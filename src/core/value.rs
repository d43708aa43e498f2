//! The logic value alphabet carried on every wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single logic level.
///
/// `Low`, `High` and `Undefined` are the values a simulation produces.
/// `Disconnected` is reserved for a future tri-state feature: it is never
/// produced by evaluation and truth tables may not contain it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Value {
    Low,
    High,
    Undefined,
    Disconnected,
}

impl Value {
    /// The bit a driven level stands for; `None` for anything else.
    pub fn bit(self) -> Option<bool> {
        match self {
            Self::Low => Some(false),
            Self::High => Some(true),
            Self::Undefined | Self::Disconnected => None,
        }
    }

    /// Replaces an unresolved value with `Low`, leaving driven levels alone.
    pub fn or_low(self) -> Self {
        match self {
            Self::Undefined => Self::Low,
            other => other,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Self::Low | Self::High)
    }
}

impl From<bool> for Value {
    fn from(level: bool) -> Self {
        if level {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<Option<bool>> for Value {
    fn from(level: Option<bool>) -> Self {
        level.map_or(Self::Undefined, Self::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Low => "LOW",
            Self::High => "HIGH",
            Self::Undefined => "UNDEFINED",
            Self::Disconnected => "DISCONNECTED",
        };
        f.write_str(text)
    }
}
