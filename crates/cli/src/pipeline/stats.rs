//! Run statistics.

use std::time::Duration;

use contracts::DestinationKind;
use observability::WriteStatsAggregator;
use writemux::MetricsSnapshot;

/// Final counters for one destination
#[derive(Debug, Clone)]
pub struct DestinationReport {
    pub name: String,
    pub kind: DestinationKind,
    pub metrics: MetricsSnapshot,
}

/// Statistics from one run
#[derive(Debug, Clone, Default)]
pub struct TeeStats {
    /// Write counts, sizes and latencies
    pub write_stats: WriteStatsAggregator,

    /// Per-destination counters captured just before close
    pub destinations: Vec<DestinationReport>,

    /// Total run duration
    pub duration: Duration,

    /// Stopped by a shutdown signal rather than EOF or error
    pub interrupted: bool,
}

impl TeeStats {
    /// Input throughput in bytes per second
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.write_stats.total_bytes as f64 / secs
        } else {
            0.0
        }
    }

    /// Print a summary to stderr (stdout may be a destination)
    pub fn print_summary(&self) {
        eprintln!("\n=== writemux run ===");
        eprintln!("  Duration:   {:.2}s", self.duration.as_secs_f64());
        eprintln!("  Throughput: {:.0} B/s", self.throughput());
        if self.interrupted {
            eprintln!("  Stopped by signal");
        }

        eprintln!("\n{}", self.write_stats.summary());

        if !self.destinations.is_empty() {
            eprintln!("Destinations:");
            for d in &self.destinations {
                eprintln!(
                    "  {:<24} {:<8} writes={} failures={} bytes={}",
                    d.name,
                    d.kind.as_str(),
                    d.metrics.write_count,
                    d.metrics.failure_count,
                    d.metrics.bytes_written
                );
            }
        }
    }
}
