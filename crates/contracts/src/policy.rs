//! Error policy selected when a multiplexer is constructed

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a multiplexer reacts to destination failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Failed destination writes are dropped and every write reports
    /// success, even with no destinations at all
    #[default]
    Ignore,
    /// The first failing destination aborts the fan-out and the failure is
    /// returned; writing to an empty set is an error
    Propagate,
}

impl ErrorPolicy {
    /// Stable lowercase name, matching the config representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Propagate => "propagate",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "propagate" => Ok(Self::Propagate),
            other => Err(format!("unknown error policy '{other}'")),
        }
    }
}
