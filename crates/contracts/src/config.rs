//! MuxConfig - Config Loader output
//!
//! Describes the error policy and the destinations a multiplexer starts with.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ErrorPolicy;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete multiplexer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MuxConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Error policy, fixed for the lifetime of the multiplexer
    #[serde(default)]
    pub policy: ErrorPolicy,

    /// Initial destinations
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
}

/// One destination entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Destination name (used for logging and statistics)
    pub name: String,

    /// Destination kind
    pub kind: DestinationKind,

    /// Kind-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl DestinationConfig {
    /// Create a config entry with no parameters
    pub fn new(name: impl Into<String>, kind: DestinationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: HashMap::new(),
        }
    }

    /// Builder-style parameter setter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Destination kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    /// Summary of every write logged via tracing
    Log,
    /// Local file
    File,
    /// UDP datagrams to a remote address
    Network,
    /// Process standard output
    Stdout,
}

impl DestinationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::File => "file",
            Self::Network => "network",
            Self::Stdout => "stdout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_config_params() {
        let cfg = DestinationConfig::new("archive", DestinationKind::File)
            .with_param("path", "/tmp/out.log")
            .with_param("append", "true");

        assert_eq!(cfg.param("path"), Some("/tmp/out.log"));
        assert_eq!(cfg.param("append"), Some("true"));
        assert_eq!(cfg.param("missing"), None);
    }

    #[test]
    fn test_defaults_from_json() {
        let cfg: MuxConfig = serde_json::from_str(r#"{"destinations": []}"#).unwrap();
        assert_eq!(cfg.version, ConfigVersion::V1);
        assert_eq!(cfg.policy, ErrorPolicy::Ignore);
        assert!(cfg.destinations.is_empty());
    }

    #[test]
    fn test_kind_snake_case() {
        let cfg: DestinationConfig =
            serde_json::from_str(r#"{"name": "n", "kind": "network"}"#).unwrap();
        assert_eq!(cfg.kind, DestinationKind::Network);
        assert!(cfg.params.is_empty());
    }
}
