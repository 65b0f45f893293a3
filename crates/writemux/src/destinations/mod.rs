//! Destination implementations
//!
//! Contains MemoryBuffer, FileDestination, NetworkDestination, LogDestination
//! and WriterDestination.

mod file;
mod log;
mod memory;
mod network;
mod writer;

pub use self::file::{FileDestination, FileDestinationConfig};
pub use self::log::LogDestination;
pub use self::memory::MemoryBuffer;
pub use self::network::{NetworkDestination, NetworkDestinationConfig};
pub use self::writer::WriterDestination;
