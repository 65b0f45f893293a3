//! Input mirroring pipeline.

mod stats;
mod tee;

pub use stats::{DestinationReport, TeeStats};
pub use tee::{Tee, TeeConfig};
