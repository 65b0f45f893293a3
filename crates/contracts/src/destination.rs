//! Destination trait - multiplexer output interface
//!
//! Defines the write-then-close capability set every fan-out member provides.

use std::io;

/// Output sink that can be a member of a multiplexer.
///
/// Implementations must be `Send` so a multiplexer holding them can be
/// shared across threads. The multiplexer only ever calls these methods
/// while holding its registry lock, so implementations need no locking of
/// their own to be safe against the multiplexer.
pub trait Destination: Send {
    /// Write the whole buffer.
    ///
    /// # Errors
    /// Any error is treated as a hard failure of this destination for the
    /// current fan-out.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Release the destination.
    ///
    /// The multiplexer discards whatever this returns.
    fn close(&mut self) -> io::Result<()>;
}

impl<D: Destination + ?Sized> Destination for Box<D> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    #[inline]
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}
