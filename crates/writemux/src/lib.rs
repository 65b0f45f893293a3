//! # writemux
//!
//! Thread-safe write multiplexer.
//!
//! Responsibilities:
//! - Keep a registry of destinations behind opaque handles
//! - Fan every write out to all current destinations, under one lock
//! - Apply the ignore/propagate error policy chosen at construction
//! - Drain and close every destination on `close`, any number of times

pub mod builder;
pub mod destinations;
pub mod error;
pub mod metrics;
pub mod multiplexer;

pub use builder::{create_destination, create_multiplexer, MultiplexerBuilder, Registration};
pub use contracts::{Destination, ErrorPolicy, Handle};
pub use destinations::{
    FileDestination, FileDestinationConfig, LogDestination, MemoryBuffer, NetworkDestination,
    NetworkDestinationConfig, WriterDestination,
};
pub use error::WriteMuxError;
pub use metrics::{MetricsSnapshot, MuxSnapshot};
pub use multiplexer::Multiplexer;
