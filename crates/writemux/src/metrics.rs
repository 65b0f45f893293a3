//! Destination and multiplexer metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single destination.
///
/// Only touched while the registry lock is held, so plain integers suffice.
#[derive(Debug, Default, Clone, Copy)]
pub struct DestinationMetrics {
    write_count: u64,
    failure_count: u64,
    bytes_written: u64,
}

impl DestinationMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful write of `bytes` bytes
    pub fn record_write(&mut self, bytes: usize) {
        self.write_count += 1;
        self.bytes_written += bytes as u64;
    }

    /// Record a failed write
    pub fn record_failure(&mut self) {
        self.failure_count += 1;
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            write_count: self.write_count,
            failure_count: self.failure_count,
            bytes_written: self.bytes_written,
        }
    }
}

/// Snapshot of destination metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub write_count: u64,
    pub failure_count: u64,
    pub bytes_written: u64,
}

/// Multiplexer-wide counters, readable without taking the registry lock
#[derive(Debug, Default)]
pub struct MuxMetrics {
    /// Write calls that returned success
    write_count: AtomicU64,
    /// Write calls that returned an error
    failure_count: AtomicU64,
    /// Write calls that found no destinations
    empty_count: AtomicU64,
}

impl MuxMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_write_count(&self) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_empty_count(&self) {
        self.empty_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MuxSnapshot {
        MuxSnapshot {
            write_count: self.write_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            empty_count: self.empty_count.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of multiplexer-wide counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MuxSnapshot {
    pub write_count: u64,
    pub failure_count: u64,
    pub empty_count: u64,
}
