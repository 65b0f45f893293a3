//! Configuration parsing
//!
//! Supports TOML (primary) and JSON.

use contracts::{ContractError, MuxConfig};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (recommended)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<MuxConfig, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<MuxConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<MuxConfig, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DestinationKind, ErrorPolicy};

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
policy = "propagate"

[[destinations]]
name = "archive"
kind = "file"
[destinations.params]
path = "./out/archive.log"
append = "true"

[[destinations]]
name = "debug"
kind = "log"
"#;

        let config = parse_toml(content).unwrap();
        assert_eq!(config.policy, ErrorPolicy::Propagate);
        assert_eq!(config.destinations.len(), 2);
        assert_eq!(config.destinations[0].kind, DestinationKind::File);
        assert_eq!(config.destinations[0].param("path"), Some("./out/archive.log"));
        assert!(config.destinations[1].params.is_empty());
    }

    #[test]
    fn test_parse_json() {
        let content = r#"{
            "policy": "ignore",
            "destinations": [
                {"name": "udp", "kind": "network", "params": {"addr": "127.0.0.1:9000"}}
            ]
        }"#;

        let config = parse_json(content).unwrap();
        assert_eq!(config.policy, ErrorPolicy::Ignore);
        assert_eq!(config.destinations[0].param("addr"), Some("127.0.0.1:9000"));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = parse_toml("policy = \"retry\"").unwrap_err();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
