//! Write metrics
//!
//! Records multiplexer activity through the `metrics` facade and keeps an
//! in-memory aggregate for end-of-run summaries.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Record one multiplexer write
pub fn record_mux_write(bytes: usize, latency: Duration, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!("writemux_writes_total", "status" => status).increment(1);
    if success {
        counter!("writemux_bytes_total").increment(bytes as u64);
    }
    histogram!("writemux_write_size_bytes").record(bytes as f64);
    histogram!("writemux_write_latency_us").record(latency.as_secs_f64() * 1_000_000.0);
}

/// Publish a destination's cumulative counters
pub fn record_destination_metrics(name: &str, write_count: u64, failure_count: u64, bytes: u64) {
    let name = name.to_string();
    gauge!("writemux_destination_writes", "destination" => name.clone()).set(write_count as f64);
    gauge!("writemux_destination_failures", "destination" => name.clone())
        .set(failure_count as f64);
    gauge!("writemux_destination_bytes", "destination" => name).set(bytes as f64);
}

/// In-memory aggregate of write activity
#[derive(Debug, Clone, Default)]
pub struct WriteStatsAggregator {
    /// Write calls that succeeded
    pub total_writes: u64,

    /// Write calls that failed
    pub failed_writes: u64,

    /// Bytes accepted by successful writes
    pub total_bytes: u64,

    /// Chunk size statistics (bytes)
    pub size_stats: RunningStats,

    /// Fan-out latency statistics (microseconds)
    pub latency_stats: RunningStats,

    /// Failure count per destination name
    pub failures_by_destination: HashMap<String, u64>,
}

impl WriteStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one write into the aggregate
    pub fn update(&mut self, bytes: usize, latency: Duration, success: bool) {
        if success {
            self.total_writes += 1;
            self.total_bytes += bytes as u64;
        } else {
            self.failed_writes += 1;
        }
        self.size_stats.push(bytes as f64);
        self.latency_stats.push(latency.as_secs_f64() * 1_000_000.0);
    }

    /// Attribute a failure to a named destination
    pub fn record_destination_failure(&mut self, name: &str) {
        *self
            .failures_by_destination
            .entry(name.to_string())
            .or_insert(0) += 1;
    }

    pub fn summary(&self) -> WriteSummary {
        let attempts = self.total_writes + self.failed_writes;
        WriteSummary {
            total_writes: self.total_writes,
            failed_writes: self.failed_writes,
            total_bytes: self.total_bytes,
            failure_rate: if attempts > 0 {
                self.failed_writes as f64 / attempts as f64 * 100.0
            } else {
                0.0
            },
            write_size_bytes: StatsSummary::from(&self.size_stats),
            latency_us: StatsSummary::from(&self.latency_stats),
            failures_by_destination: self.failures_by_destination.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Aggregate summary
#[derive(Debug, Clone, Default)]
pub struct WriteSummary {
    pub total_writes: u64,
    pub failed_writes: u64,
    pub total_bytes: u64,
    pub failure_rate: f64,
    pub write_size_bytes: StatsSummary,
    pub latency_us: StatsSummary,
    pub failures_by_destination: HashMap<String, u64>,
}

impl fmt::Display for WriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Write Summary ===")?;
        writeln!(f, "Writes: {}", self.total_writes)?;
        writeln!(
            f,
            "Failed writes: {} ({:.2}%)",
            self.failed_writes, self.failure_rate
        )?;
        writeln!(f, "Bytes: {}", self.total_bytes)?;
        writeln!(f, "Write size (bytes): {}", self.write_size_bytes)?;
        writeln!(f, "Latency (us): {}", self.latency_us)?;

        if !self.failures_by_destination.is_empty() {
            writeln!(f, "Failures by destination:")?;
            for (name, count) in &self.failures_by_destination {
                writeln!(f, "  {}: {}", name, count)?;
            }
        }

        Ok(())
    }
}

/// Summary of a [`RunningStats`]
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut agg = WriteStatsAggregator::new();

        agg.update(100, Duration::from_micros(10), true);
        agg.update(50, Duration::from_micros(30), true);
        agg.update(10, Duration::from_micros(5), false);
        agg.record_destination_failure("udp");

        assert_eq!(agg.total_writes, 2);
        assert_eq!(agg.failed_writes, 1);
        assert_eq!(agg.total_bytes, 150);
        assert_eq!(agg.size_stats.count(), 3);
        assert_eq!(agg.failures_by_destination.get("udp"), Some(&1));

        let summary = agg.summary();
        assert!((summary.failure_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_display() {
        let mut agg = WriteStatsAggregator::new();
        agg.update(4, Duration::from_micros(2), true);

        let output = agg.summary().to_string();
        assert!(output.contains("Writes: 1"));
        assert!(output.contains("0.00%"));
        assert!(output.contains("Bytes: 4"));
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_mux_write(10, Duration::from_micros(1), true);
        record_destination_metrics("file", 1, 0, 10);
    }
}
