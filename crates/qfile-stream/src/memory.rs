use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use crate::traits::StreamIdentity;

/// An in-memory stream with a caller-chosen identity.
///
/// Behaves like a file opened read-write: writes past the end extend the
/// buffer and seeking past the end is allowed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    inner: Cursor<Vec<u8>>,
    name: String,
}

impl MemoryStream {
    /// Create an empty stream.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_bytes(name, Vec::new())
    }

    /// Create a stream over existing bytes, positioned at the start.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Cursor::new(bytes.into()),
            name: name.into(),
        }
    }

    /// The bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }

    /// Current position.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Move to an absolute position.
    pub fn set_position(&mut self, pos: u64) {
        self.inner.set_position(pos);
    }

    /// Consume the stream and return its bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryStream {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl StreamIdentity for MemoryStream {
    fn identity(&self) -> &str {
        &self.name
    }
}
