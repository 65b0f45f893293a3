//! Builder - constructs a multiplexer and its destinations from configuration

use contracts::{Destination, DestinationConfig, DestinationKind, Handle, MuxConfig};
use tracing::{debug, info, instrument};

use crate::destinations::{FileDestination, LogDestination, NetworkDestination, WriterDestination};
use crate::error::WriteMuxError;
use crate::multiplexer::Multiplexer;

/// Name and handle of a destination added from configuration
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub kind: DestinationKind,
    pub handle: Handle,
}

/// Builder for creating a Multiplexer from a [`MuxConfig`]
pub struct MultiplexerBuilder {
    config: MuxConfig,
}

impl MultiplexerBuilder {
    /// Create a new MultiplexerBuilder
    pub fn new(config: MuxConfig) -> Self {
        Self { config }
    }

    /// Build every configured destination, then register them all.
    ///
    /// If any destination fails to build, the ones already built are closed
    /// and nothing is registered.
    #[instrument(
        name = "multiplexer_builder_build",
        skip(self),
        fields(policy = %self.config.policy, destinations = self.config.destinations.len())
    )]
    pub fn build(self) -> Result<(Multiplexer, Vec<Registration>), WriteMuxError> {
        let destinations = Self::initialize_destinations(&self.config.destinations)?;

        let multiplexer = Multiplexer::new(self.config.policy);
        let registrations = self
            .config
            .destinations
            .into_iter()
            .zip(destinations)
            .map(|(config, destination)| Registration {
                handle: multiplexer.add_boxed(destination),
                name: config.name,
                kind: config.kind,
            })
            .collect::<Vec<_>>();

        info!(
            policy = %multiplexer.policy(),
            destinations = registrations.len(),
            "Multiplexer built"
        );
        Ok((multiplexer, registrations))
    }

    fn initialize_destinations(
        configs: &[DestinationConfig],
    ) -> Result<Vec<Box<dyn Destination>>, WriteMuxError> {
        let mut built: Vec<Box<dyn Destination>> = Vec::with_capacity(configs.len());
        for config in configs {
            match create_destination(config) {
                Ok(destination) => built.push(destination),
                Err(e) => {
                    for mut destination in built {
                        let _ = destination.close();
                    }
                    return Err(e);
                }
            }
        }
        Ok(built)
    }
}

/// Create a destination from configuration
#[instrument(
    name = "multiplexer_create_destination",
    skip(config),
    fields(destination = %config.name, kind = config.kind.as_str())
)]
pub fn create_destination(
    config: &DestinationConfig,
) -> Result<Box<dyn Destination>, WriteMuxError> {
    let destination: Box<dyn Destination> = match config.kind {
        DestinationKind::Log => Box::new(LogDestination::new(&config.name)),
        DestinationKind::Stdout => Box::new(WriterDestination::stdout()),
        DestinationKind::File => Box::new(
            FileDestination::from_params(&config.name, &config.params)
                .map_err(|e| WriteMuxError::destination_creation(&config.name, e.to_string()))?,
        ),
        DestinationKind::Network => Box::new(
            NetworkDestination::from_params(&config.name, &config.params)
                .map_err(|e| WriteMuxError::destination_creation(&config.name, e.to_string()))?,
        ),
    };
    debug!("Destination created");
    Ok(destination)
}

/// Convenience function to create a multiplexer from configuration
pub fn create_multiplexer(
    config: MuxConfig,
) -> Result<(Multiplexer, Vec<Registration>), WriteMuxError> {
    MultiplexerBuilder::new(config).build()
}
