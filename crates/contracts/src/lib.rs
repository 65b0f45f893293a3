//! # Contracts
//!
//! Shared interface contracts for the write multiplexer workspace: the
//! destination trait, membership handles, error policy and configuration types.
//! Every other crate depends on this one; it depends on none of them.

mod config;
mod destination;
mod error;
mod handle;
mod policy;

pub use config::*;
pub use destination::Destination;
pub use error::*;
pub use handle::Handle;
pub use policy::ErrorPolicy;
