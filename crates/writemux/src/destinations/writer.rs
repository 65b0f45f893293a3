//! WriterDestination - adapts any `io::Write` into a destination

use std::io::{self, Write};

use contracts::Destination;

/// Destination backed by an arbitrary writer.
///
/// `close` flushes and drops the writer; later writes fail with
/// [`io::ErrorKind::NotConnected`].
pub struct WriterDestination<W: Write + Send> {
    writer: Option<W>,
}

impl<W: Write + Send> WriterDestination<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
        }
    }

    /// Take back the writer, if it has not been closed
    pub fn into_inner(self) -> Option<W> {
        self.writer
    }
}

impl WriterDestination<io::Stdout> {
    /// Destination mirroring into the process's standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Destination for WriterDestination<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "writer is closed"))?;
        writer.write_all(buf)?;
        Ok(buf.len())
    }

    fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }
}
