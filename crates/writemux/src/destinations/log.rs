//! LogDestination - logs a summary of each write via tracing

use std::io;

use contracts::Destination;
use tracing::{info, instrument};

/// Number of leading bytes shown in each log line
const PREVIEW_LEN: usize = 32;

/// Destination that logs write summaries for debugging
pub struct LogDestination {
    name: String,
    writes: u64,
    bytes: u64,
}

impl LogDestination {
    /// Create a new LogDestination with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            writes: 0,
            bytes: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn log_write_summary(&self, buf: &[u8]) {
        let preview_end = buf.len().min(PREVIEW_LEN);
        info!(
            destination = %self.name,
            write = self.writes,
            bytes = buf.len(),
            total_bytes = self.bytes,
            preview = %String::from_utf8_lossy(&buf[..preview_end]),
            "Write received"
        );
    }
}

impl Destination for LogDestination {
    #[instrument(
        name = "log_destination_write",
        level = "trace",
        skip(self, buf),
        fields(destination = %self.name)
    )]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        self.bytes += buf.len() as u64;
        self.log_write_summary(buf);
        Ok(buf.len())
    }

    #[instrument(name = "log_destination_close", skip(self))]
    fn close(&mut self) -> io::Result<()> {
        info!(
            destination = %self.name,
            writes = self.writes,
            bytes = self.bytes,
            "LogDestination closed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_destination_write() {
        let mut dest = LogDestination::new("test_log");
        assert_eq!(dest.write(b"some bytes").unwrap(), 10);
        assert_eq!(dest.write(&[0xff; 100]).unwrap(), 100);
        assert_eq!(dest.writes, 2);
        assert_eq!(dest.bytes, 110);
        assert!(dest.close().is_ok());
    }

    #[test]
    fn test_log_destination_name() {
        let dest = LogDestination::new("my_logger");
        assert_eq!(dest.name(), "my_logger");
    }
}
