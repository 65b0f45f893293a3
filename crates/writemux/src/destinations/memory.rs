//! MemoryBuffer - shared in-memory destination

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::Destination;

#[derive(Debug, Default)]
struct BufferState {
    data: Vec<u8>,
    closed: bool,
}

/// In-memory destination whose clones all view the same bytes.
///
/// Add one clone to a multiplexer and keep another to inspect what was
/// written. Once closed, further writes fail with
/// [`io::ErrorKind::BrokenPipe`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    inner: Arc<Mutex<BufferState>>,
}

impl MemoryBuffer {
    /// Create an empty, open buffer
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, BufferState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of everything written so far
    pub fn contents(&self) -> Vec<u8> {
        self.state().data.clone()
    }

    /// Contents as UTF-8, with invalid sequences replaced
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.state().data).into_owned()
    }

    pub fn len(&self) -> usize {
        self.state().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().data.is_empty()
    }

    /// True once `close` has been called on any clone
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// Drop the contents and reopen the buffer
    pub fn reset(&self) {
        let mut state = self.state();
        state.data.clear();
        state.closed = false;
    }
}

impl Destination for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state();
        if state.closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "memory buffer is closed",
            ));
        }
        state.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn close(&mut self) -> io::Result<()> {
        self.state().closed = true;
        Ok(())
    }
}
