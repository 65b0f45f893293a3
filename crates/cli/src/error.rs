//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Chunk size must be positive
    #[error("Invalid chunk size {size}: must be greater than zero")]
    InvalidChunkSize { size: usize },

    /// Reading the input stream failed
    #[error("Failed to read input: {0}")]
    Input(#[source] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}
