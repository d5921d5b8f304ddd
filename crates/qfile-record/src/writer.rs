use std::fmt;
use std::io::{ErrorKind, Seek, SeekFrom, Write};

use bytes::BytesMut;

use crate::codec::{encode_record, Record, PTR_PAYLOAD_SIZE};
use crate::error::{RecordError, Result};
use crate::rec_type::PTR;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete records to any `Write` stream.
///
/// Every write method returns the record type on success. A write that fails
/// part way leaves the stream wherever it stopped; truncating or discarding
/// the partial file is up to the caller.
pub struct RecordWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> RecordWriter<T> {
    /// Create a new record writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write one record.
    pub fn write_record(&mut self, rec_type: u8, payload: &[u8]) -> Result<u8> {
        self.buf.clear();
        encode_record(rec_type, payload, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(RecordError::Write(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(RecordError::Write(err)),
            }
        }
        Ok(rec_type)
    }

    /// Write a record built in memory. Its offset is ignored.
    pub fn write(&mut self, record: &Record) -> Result<u8> {
        self.write_record(record.rec_type, record.payload.as_ref())
    }

    /// Write a record whose payload is formatted text.
    ///
    /// ```ignore
    /// writer.write_formatted(rec_type::SIZE, format_args!("{:>15} {:>15}", size, offset))?;
    /// ```
    pub fn write_formatted(&mut self, rec_type: u8, args: fmt::Arguments<'_>) -> Result<u8> {
        match args.as_str() {
            Some(text) => self.write_record(rec_type, text.as_bytes()),
            None => {
                let text = fmt::format(args);
                self.write_record(rec_type, text.as_bytes())
            }
        }
    }

    /// Write a record whose payload is `text`.
    pub fn write_string(&mut self, rec_type: u8, text: &str) -> Result<u8> {
        self.write_record(rec_type, text.as_bytes())
    }

    /// Write a filler record at least `min_size` bytes long in total.
    ///
    /// The payload is blanks ending in `'0'` and is never shorter than one
    /// byte.
    pub fn write_padding(&mut self, rec_type: u8, min_size: usize) -> Result<u8> {
        let width = min_size.saturating_sub(2).max(1);
        self.write_formatted(rec_type, format_args!("{:>width$}", "0"))
    }

    /// Write a pointer record with a fixed-width payload.
    ///
    /// `0` reserves a placeholder that readers ignore until it is
    /// overwritten with a real target.
    pub fn write_pointer(&mut self, offset: u64) -> Result<u8> {
        self.write_formatted(PTR, format_args!("{:>width$}", offset, width = PTR_PAYLOAD_SIZE))
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(RecordError::Write(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Write + Seek> RecordWriter<T> {
    /// Overwrite the type byte of the record at `offset`.
    ///
    /// Length and payload are left alone. The stream is left just past the
    /// rewritten byte.
    pub fn rewrite_type_at(&mut self, rec_type: u8, offset: u64) -> Result<u8> {
        self.inner
            .seek(SeekFrom::Start(offset))
            .map_err(|source| RecordError::Seek { offset, source })?;
        loop {
            match self.inner.write(&[rec_type]) {
                Ok(0) => return Err(RecordError::Write(ErrorKind::WriteZero.into())),
                Ok(_) => return Ok(rec_type),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(RecordError::Write(err)),
            }
        }
    }

    /// Overwrite the fixed-width pointer record at `offset` with a new target.
    pub fn rewrite_pointer_at(&mut self, offset: u64, target: u64) -> Result<u8> {
        self.seek_to(offset)?;
        self.write_pointer(target)
    }

    /// Seek to an absolute offset.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner
            .seek(SeekFrom::Start(offset))
            .map(|_| ())
            .map_err(|source| RecordError::Seek { offset, source })
    }

    /// Seek to end of stream and return the new position.
    pub fn seek_end(&mut self) -> Result<u64> {
        Ok(self.inner.seek(SeekFrom::End(0))?)
    }

    /// Current stream position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }
}
