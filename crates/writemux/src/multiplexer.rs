//! Multiplexer - registry of destinations with synchronous fan-out

use std::collections::HashMap;
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::{Destination, ErrorPolicy, Handle};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::WriteMuxError;
use crate::metrics::{DestinationMetrics, MetricsSnapshot, MuxMetrics, MuxSnapshot};

/// One registry member
struct Entry {
    destination: Box<dyn Destination>,
    metrics: DestinationMetrics,
}

/// Write sink that mirrors every write and close to a dynamic set of
/// destinations.
///
/// All operations take `&self` and are safe to call from many threads. A
/// single lock covers membership changes, the whole fan-out of a write and
/// the whole drain of a close, so a destination added during a write either
/// receives all of it or none of it.
///
/// ```
/// use writemux::{MemoryBuffer, Multiplexer};
///
/// let mux = Multiplexer::propagating();
/// let buf = MemoryBuffer::new();
/// mux.add(buf.clone());
///
/// assert_eq!(mux.write(b"hello").unwrap(), 5);
/// assert_eq!(buf.as_string(), "hello");
/// ```
pub struct Multiplexer {
    policy: ErrorPolicy,
    destinations: Mutex<HashMap<Handle, Entry>>,
    metrics: MuxMetrics,
}

impl Multiplexer {
    /// Create an empty multiplexer with the given error policy
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            destinations: Mutex::new(HashMap::new()),
            metrics: MuxMetrics::new(),
        }
    }

    /// Empty multiplexer that ignores destination failures
    pub fn ignoring() -> Self {
        Self::new(ErrorPolicy::Ignore)
    }

    /// Empty multiplexer that stops at and returns the first destination failure
    pub fn propagating() -> Self {
        Self::new(ErrorPolicy::Propagate)
    }

    /// Error policy chosen at construction
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    // A panicking destination poisons the lock but leaves the map itself intact.
    fn registry(&self) -> MutexGuard<'_, HashMap<Handle, Entry>> {
        self.destinations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a destination, returning the handle that removes it again.
    ///
    /// The handle should not be interpreted as anything beyond a future
    /// argument to [`Multiplexer::remove`].
    pub fn add<D: Destination + 'static>(&self, destination: D) -> Handle {
        self.add_boxed(Box::new(destination))
    }

    /// Add an already boxed destination
    pub fn add_boxed(&self, destination: Box<dyn Destination>) -> Handle {
        let mut registry = self.registry();
        let handle = fresh_handle(&registry);
        registry.insert(
            handle.clone(),
            Entry {
                destination,
                metrics: DestinationMetrics::new(),
            },
        );
        debug!(handle = %handle, destinations = registry.len(), "Destination added");
        handle
    }

    /// Remove the destination registered under `handle`.
    ///
    /// Unknown or stale handles are a no-op. The removed destination is
    /// handed back unclosed; closing it is up to the caller.
    pub fn remove(&self, handle: &Handle) -> Option<Box<dyn Destination>> {
        let mut registry = self.registry();
        let removed = registry.remove(handle).map(|entry| entry.destination);
        debug!(
            handle = %handle,
            found = removed.is_some(),
            destinations = registry.len(),
            "Destination removed"
        );
        removed
    }

    /// Write `buf` to every destination.
    ///
    /// With [`ErrorPolicy::Ignore`] this always returns `Ok(buf.len())`,
    /// including when there are no destinations. With
    /// [`ErrorPolicy::Propagate`] an empty set yields
    /// [`WriteMuxError::NoDestinations`], and the first failing destination
    /// stops the fan-out: destinations not yet visited do not receive `buf`.
    /// Visit order is unspecified.
    pub fn write(&self, buf: &[u8]) -> Result<usize, WriteMuxError> {
        let mut registry = self.registry();

        if registry.is_empty() {
            self.metrics.inc_empty_count();
            return match self.policy {
                ErrorPolicy::Propagate => {
                    self.metrics.inc_failure_count();
                    Err(WriteMuxError::NoDestinations)
                }
                ErrorPolicy::Ignore => {
                    self.metrics.inc_write_count();
                    Ok(buf.len())
                }
            };
        }

        for (handle, entry) in registry.iter_mut() {
            match entry.destination.write(buf) {
                Ok(written) => entry.metrics.record_write(written),
                Err(e) => {
                    entry.metrics.record_failure();
                    match self.policy {
                        ErrorPolicy::Ignore => {
                            trace!(
                                handle = %handle,
                                error = %e,
                                "Destination write failed, ignoring"
                            );
                        }
                        ErrorPolicy::Propagate => {
                            debug!(
                                handle = %handle,
                                error = %e,
                                "Destination write failed, halting fan-out"
                            );
                            self.metrics.inc_failure_count();
                            return Err(WriteMuxError::destination_write(handle.clone(), e));
                        }
                    }
                }
            }
        }

        self.metrics.inc_write_count();
        Ok(buf.len())
    }

    /// Close and remove every destination.
    ///
    /// Errors from individual destinations are discarded. Safe to call any
    /// number of times; the multiplexer stays usable afterwards.
    pub fn close(&self) {
        let mut registry = self.registry();
        let count = registry.len();

        for (handle, mut entry) in registry.drain() {
            if let Err(e) = entry.destination.close() {
                trace!(handle = %handle, error = %e, "Destination close failed, ignoring");
            }
        }

        debug!(closed = count, "Multiplexer drained");
    }

    /// Number of current destinations
    pub fn len(&self) -> usize {
        self.registry().len()
    }

    /// True when there are no destinations
    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    /// True if `handle` currently identifies a destination
    pub fn contains(&self, handle: &Handle) -> bool {
        self.registry().contains_key(handle)
    }

    /// Handles of all current destinations, in no particular order
    pub fn handles(&self) -> Vec<Handle> {
        self.registry().keys().cloned().collect()
    }

    /// Per-destination counters for all current destinations
    pub fn metrics(&self) -> Vec<(Handle, MetricsSnapshot)> {
        self.registry()
            .iter()
            .map(|(handle, entry)| (handle.clone(), entry.metrics.snapshot()))
            .collect()
    }

    /// Multiplexer-wide counters
    pub fn stats(&self) -> MuxSnapshot {
        self.metrics.snapshot()
    }
}

/// Random v4 UUID not already used as a key in `registry`
fn fresh_handle(registry: &HashMap<Handle, Entry>) -> Handle {
    loop {
        let handle = Handle::from(Uuid::new_v4().to_string());
        if !registry.contains_key(&handle) {
            return handle;
        }
    }
}

impl Default for Multiplexer {
    fn default() -> Self {
        Self::new(ErrorPolicy::default())
    }
}

impl std::fmt::Debug for Multiplexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multiplexer")
            .field("policy", &self.policy)
            .field("destinations", &self.len())
            .finish()
    }
}

/// A multiplexer can itself be a member of another multiplexer.
impl Destination for Multiplexer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Multiplexer::write(self, buf).map_err(io::Error::from)
    }

    fn close(&mut self) -> io::Result<()> {
        Multiplexer::close(self);
        Ok(())
    }
}

impl io::Write for &Multiplexer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Multiplexer::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for Multiplexer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Multiplexer::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
