//! Layered error definitions
//!
//! Categorized by source: config / destination / io

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Destination Errors =====
    /// Missing or malformed destination parameter
    #[error("destination '{name}' has invalid parameter '{param}': {message}")]
    DestinationParam {
        name: String,
        param: String,
        message: String,
    },

    /// Destination connection error
    #[error("destination '{name}' connection error: {message}")]
    DestinationConnection { name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create destination parameter error
    pub fn destination_param(
        name: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DestinationParam {
            name: name.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create destination connection error
    pub fn destination_connection(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DestinationConnection {
            name: name.into(),
            message: message.into(),
        }
    }
}
