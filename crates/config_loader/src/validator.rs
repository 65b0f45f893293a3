//! Configuration validation
//!
//! Rules:
//! - destination names non-empty and unique
//! - file destinations carry a `path`
//! - network destinations carry a parseable `addr`

use std::collections::HashSet;
use std::net::SocketAddr;

use contracts::{ContractError, DestinationConfig, DestinationKind, MuxConfig};

/// Validate a MuxConfig
///
/// Returns the first error encountered.
pub fn validate(config: &MuxConfig) -> Result<(), ContractError> {
    validate_destination_names(config)?;
    for (idx, destination) in config.destinations.iter().enumerate() {
        validate_destination_params(idx, destination)?;
    }
    Ok(())
}

fn validate_destination_names(config: &MuxConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, destination) in config.destinations.iter().enumerate() {
        if destination.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("destinations[{}].name", idx),
                "destination name cannot be empty",
            ));
        }
        if !seen.insert(destination.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("destinations[name={}]", destination.name),
                "duplicate destination name",
            ));
        }
    }
    Ok(())
}

fn validate_destination_params(
    idx: usize,
    destination: &DestinationConfig,
) -> Result<(), ContractError> {
    match destination.kind {
        DestinationKind::File => {
            let path = destination.param("path").unwrap_or_default();
            if path.trim().is_empty() {
                return Err(ContractError::config_validation(
                    format!("destinations[{}].params.path", idx),
                    "file destination requires a non-empty 'path'",
                ));
            }
        }
        DestinationKind::Network => {
            let addr = destination.param("addr").ok_or_else(|| {
                ContractError::config_validation(
                    format!("destinations[{}].params.addr", idx),
                    "network destination requires 'addr'",
                )
            })?;
            addr.parse::<SocketAddr>().map_err(|e| {
                ContractError::config_validation(
                    format!("destinations[{}].params.addr", idx),
                    format!("invalid address '{addr}': {e}"),
                )
            })?;
        }
        DestinationKind::Log | DestinationKind::Stdout => {}
    }
    Ok(())
}
