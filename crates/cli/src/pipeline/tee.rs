//! Tee - reads an input stream and mirrors each chunk through a multiplexer.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, instrument, warn};
use writemux::{Handle, MetricsSnapshot, Multiplexer, Registration};

use super::stats::{DestinationReport, TeeStats};
use crate::error::CliError;

/// Tee configuration
#[derive(Debug, Clone)]
pub struct TeeConfig {
    /// Bytes requested per read; each read is one multiplexer write
    pub chunk_size: usize,
}

/// Owns the multiplexer for the duration of one run.
///
/// Fan-outs and the final close run on the blocking pool, so a stalled
/// destination never keeps the shutdown signal from being observed.
pub struct Tee {
    multiplexer: Arc<Multiplexer>,
    registrations: Vec<Registration>,
    config: TeeConfig,
}

impl Tee {
    pub fn new(
        multiplexer: Multiplexer,
        registrations: Vec<Registration>,
        config: TeeConfig,
    ) -> Self {
        Self {
            multiplexer: Arc::new(multiplexer),
            registrations,
            config,
        }
    }

    /// Mirror `input` until EOF, a failed write, or `shutdown` resolves.
    ///
    /// The multiplexer is closed on every exit path.
    #[instrument(
        name = "tee_run",
        skip_all,
        fields(policy = %self.multiplexer.policy(), destinations = self.registrations.len())
    )]
    pub async fn run<R, F>(self, mut input: R, shutdown: F) -> Result<TeeStats>
    where
        R: AsyncRead + Unpin,
        F: Future<Output = ()>,
    {
        info!("Mirroring started");

        let start = Instant::now();
        let mut stats = TeeStats::default();
        let mut buf = vec![0u8; self.config.chunk_size.max(1)];
        tokio::pin!(shutdown);

        let outcome: Result<()> = loop {
            let read = tokio::select! {
                read = input.read(&mut buf) => read,
                _ = &mut shutdown => {
                    warn!("Received shutdown signal, stopping");
                    stats.interrupted = true;
                    break Ok(());
                }
            };

            let n = match read {
                Ok(0) => break Ok(()),
                Ok(n) => n,
                Err(e) => break Err(CliError::Input(e).into()),
            };

            let multiplexer = Arc::clone(&self.multiplexer);
            let chunk = buf[..n].to_vec();
            let fanout = tokio::task::spawn_blocking(move || {
                let write_start = Instant::now();
                let result = multiplexer.write(&chunk);
                (result, write_start.elapsed())
            });

            let (result, latency) = tokio::select! {
                joined = fanout => match joined {
                    Ok(done) => done,
                    Err(e) => break Err(anyhow::Error::new(e).context("Fan-out task failed")),
                },
                _ = &mut shutdown => {
                    warn!("Received shutdown signal during a write, stopping");
                    stats.interrupted = true;
                    break Ok(());
                }
            };

            observability::record_mux_write(n, latency, result.is_ok());
            stats.write_stats.update(n, latency, result.is_ok());

            if let Err(e) = result {
                if let Some(name) = e.handle().and_then(|h| self.name_of(h)) {
                    stats.write_stats.record_destination_failure(name);
                }
                break Err(e.into());
            }

            if stats.write_stats.total_writes % 1000 == 0 {
                debug!(chunks = stats.write_stats.total_writes, "Mirroring progress");
            }
        };

        // Waits for any fan-out still in flight
        let multiplexer = Arc::clone(&self.multiplexer);
        let metrics = tokio::task::spawn_blocking(move || {
            // Snapshot before close; close drains the registry
            let metrics = multiplexer.metrics();
            multiplexer.close();
            metrics
        })
        .await
        .context("Closing destinations failed")?;

        stats.destinations = self.destination_reports(&metrics);
        for report in &stats.destinations {
            observability::record_destination_metrics(
                &report.name,
                report.metrics.write_count,
                report.metrics.failure_count,
                report.metrics.bytes_written,
            );
        }
        stats.duration = start.elapsed();

        match outcome {
            Ok(()) => {
                info!(
                    chunks = stats.write_stats.total_writes,
                    bytes = stats.write_stats.total_bytes,
                    "Mirroring finished"
                );
                Ok(stats)
            }
            Err(e) => {
                warn!(
                    chunks = stats.write_stats.total_writes,
                    bytes = stats.write_stats.total_bytes,
                    "Mirroring aborted"
                );
                Err(e)
            }
        }
    }

    fn name_of(&self, handle: &Handle) -> Option<&str> {
        self.registrations
            .iter()
            .find(|r| &r.handle == handle)
            .map(|r| r.name.as_str())
    }

    fn destination_reports(
        &self,
        metrics: &[(Handle, MetricsSnapshot)],
    ) -> Vec<DestinationReport> {
        self.registrations
            .iter()
            .filter_map(|registration| {
                metrics
                    .iter()
                    .find(|(handle, _)| *handle == registration.handle)
                    .map(|(_, snapshot)| DestinationReport {
                        name: registration.name.clone(),
                        kind: registration.kind,
                        metrics: *snapshot,
                    })
            })
            .collect()
    }
}
