//! NetworkDestination - UDP fire-and-forget mirroring

use std::collections::HashMap;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use contracts::{ContractError, Destination};
use tracing::{debug, instrument};

/// Default max datagram payload, below the 65507-byte IPv4 UDP limit
const DEFAULT_MAX_PACKET_SIZE: usize = 65000;

/// Configuration for NetworkDestination
#[derive(Debug, Clone)]
pub struct NetworkDestinationConfig {
    /// Target address
    pub addr: SocketAddr,
    /// Writes larger than this are split into several datagrams
    pub max_packet_size: usize,
}

impl NetworkDestinationConfig {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }

    /// Create config from params map
    pub fn from_params(
        name: &str,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let addr_str = params
            .get("addr")
            .ok_or_else(|| ContractError::destination_param(name, "addr", "missing"))?;

        let addr: SocketAddr = addr_str.parse().map_err(|e| {
            ContractError::destination_param(
                name,
                "addr",
                format!("invalid address '{addr_str}': {e}"),
            )
        })?;

        let max_packet_size = match params.get("max_packet_size") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| {
                    ContractError::destination_param(
                        name,
                        "max_packet_size",
                        format!("expected a positive integer, got '{raw}'"),
                    )
                })?,
            None => DEFAULT_MAX_PACKET_SIZE,
        };

        Ok(Self {
            addr,
            max_packet_size,
        })
    }
}

/// Destination that sends every write over UDP
pub struct NetworkDestination {
    name: String,
    config: NetworkDestinationConfig,
    socket: Option<UdpSocket>,
}

impl NetworkDestination {
    /// Bind an ephemeral local port and connect it to the target
    #[instrument(
        name = "network_destination_new",
        skip(name, config),
        fields(target = %config.addr)
    )]
    pub fn new(name: impl Into<String>, config: NetworkDestinationConfig) -> io::Result<Self> {
        let name = name.into();
        let local = if config.addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(config.addr)?;

        debug!(destination = %name, target = %config.addr, "NetworkDestination connected");

        Ok(Self {
            name,
            config,
            socket: Some(socket),
        })
    }

    /// Create from params (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let config = NetworkDestinationConfig::from_params(&name, params)?;
        Self::new(name.clone(), config)
            .map_err(|e| ContractError::destination_connection(name, e.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local address of the underlying socket, if still open
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }
}

impl Destination for NetworkDestination {
    #[instrument(
        name = "network_destination_write",
        level = "trace",
        skip(self, buf),
        fields(destination = %self.name, bytes = buf.len())
    )]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let socket = self.socket.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "network destination is closed")
        })?;

        for chunk in buf.chunks(self.config.max_packet_size) {
            socket.send(chunk)?;
        }
        Ok(buf.len())
    }

    #[instrument(name = "network_destination_close", skip(self), fields(destination = %self.name))]
    fn close(&mut self) -> io::Result<()> {
        if self.socket.take().is_some() {
            debug!(target = %self.config.addr, "NetworkDestination closed");
        }
        Ok(())
    }
}
