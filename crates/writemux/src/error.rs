//! Multiplexer error types

use std::io;

use contracts::Handle;
use thiserror::Error;

/// Multiplexer-specific errors
#[derive(Debug, Error)]
pub enum WriteMuxError {
    /// Propagate-mode write against an empty destination set
    #[error("there are no destinations in the mux")]
    NoDestinations,

    /// Propagate-mode write failed on one destination; the fan-out stopped there
    #[error("error during mux write to '{handle}': {source}")]
    DestinationWrite {
        handle: Handle,
        #[source]
        source: io::Error,
    },

    /// Destination could not be built from configuration
    #[error("failed to create destination '{name}': {message}")]
    DestinationCreation { name: String, message: String },
}

impl WriteMuxError {
    /// Create a destination write error
    pub fn destination_write(handle: Handle, source: io::Error) -> Self {
        Self::DestinationWrite { handle, source }
    }

    /// Create a destination creation error
    pub fn destination_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DestinationCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Handle of the destination that failed, if this is a write failure
    pub fn handle(&self) -> Option<&Handle> {
        match self {
            Self::DestinationWrite { handle, .. } => Some(handle),
            _ => None,
        }
    }
}

impl From<WriteMuxError> for io::Error {
    fn from(err: WriteMuxError) -> Self {
        let kind = match &err {
            WriteMuxError::NoDestinations => io::ErrorKind::NotConnected,
            WriteMuxError::DestinationWrite { source, .. } => source.kind(),
            WriteMuxError::DestinationCreation { .. } => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
