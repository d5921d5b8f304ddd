use std::io::{Read, Seek, SeekFrom};

use bytes::Bytes;
use qfile_stream::StreamIdentity;
use tracing::{debug, warn};

use crate::codec::{ReadFlags, ReaderConfig, Record};
use crate::error::{RecordError, Result};
use crate::pointer::{follow_pointer, LoopGuard};
use crate::rec_type::{DTXT, END, PTR};
use crate::varint::{decode_length, read_byte};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Read the next record from `stream`, handling the record types selected by
/// `flags` along the way.
///
/// Returns `Ok(None)` when the stream ends cleanly between records.
pub fn read_record_raw<S>(
    stream: &mut S,
    guard: &mut LoopGuard,
    config: &ReaderConfig,
    flags: ReadFlags,
) -> Result<Option<Record>>
where
    S: Read + Seek + StreamIdentity + ?Sized,
{
    loop {
        let offset = stream.stream_position()?;
        let Some(rec_type) = read_byte(stream)? else {
            return Ok(None);
        };

        let length = decode_length(stream).inspect_err(|err| {
            warn!(identity = stream.identity(), offset, rec_type, "{err}");
        })?;

        if config.max_length > 0 && length > config.max_length {
            warn!(
                identity = stream.identity(),
                offset,
                rec_type,
                length,
                "illegal record length"
            );
            if config.resync_on_oversize {
                discard(stream, length);
            }
            return Err(RecordError::LengthOutOfRange {
                length,
                max: config.max_length,
            });
        }

        let payload = read_payload(stream, length).inspect_err(|err| {
            warn!(identity = stream.identity(), offset, rec_type, "{err}");
        })?;

        if rec_type == PTR && flags.contains(ReadFlags::FOLLOW_POINTERS) {
            let text = std::str::from_utf8(&payload).map_err(|_| {
                RecordError::MalformedPointer(String::from_utf8_lossy(&payload).into_owned())
            })?;
            follow_pointer(stream, guard, text)?;
            continue;
        }
        if rec_type == DTXT && flags.contains(ReadFlags::SKIP_DELETED) {
            continue;
        }
        if rec_type == END && flags.contains(ReadFlags::SEEK_END) {
            if let Err(err) = stream.seek(SeekFrom::End(0)) {
                debug!(identity = stream.identity(), %err, "seek to end after END record failed");
            }
        }

        return Ok(Some(Record {
            rec_type,
            payload,
            offset,
        }));
    }
}

fn read_payload<R: Read + ?Sized>(src: &mut R, length: usize) -> Result<Bytes> {
    let mut buf = Vec::with_capacity(length.min(INITIAL_BUFFER_CAPACITY));
    (&mut *src).take(length as u64).read_to_end(&mut buf)?;
    if buf.len() < length {
        return Err(RecordError::ShortRead("payload"));
    }
    Ok(Bytes::from(buf))
}

fn discard<R: Read + StreamIdentity + ?Sized>(src: &mut R, length: usize) {
    let identity = src.identity().to_string();
    let mut limited = (&mut *src).take(length as u64);
    match std::io::copy(&mut limited, &mut std::io::sink()) {
        Ok(skipped) => debug!(%identity, skipped, length, "discarded oversized record"),
        Err(err) => debug!(%identity, %err, "discarding oversized record failed"),
    }
}

/// Reads records from a random-access stream.
///
/// Owns the pointer-cycle state for the stream, so each reader session
/// starts with a clean [`LoopGuard`].
pub struct RecordReader<T> {
    inner: T,
    guard: LoopGuard,
    config: ReaderConfig,
}

impl<T> RecordReader<T> {
    /// Create a new record reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, ReaderConfig::default())
    }

    /// Create a new record reader with explicit configuration.
    pub fn with_config(inner: T, config: ReaderConfig) -> Self {
        Self {
            inner,
            guard: LoopGuard::with_limit(config.max_reverse_jumps),
            config,
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

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// The pointer-cycle state of this session.
    pub fn guard(&self) -> &LoopGuard {
        &self.guard
    }

    /// Update the maximum payload length for subsequent reads.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.config.max_length = max_length;
    }

    /// Current reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

impl<T: Read + Seek + StreamIdentity> RecordReader<T> {
    /// Read the next record, following pointers, skipping deleted text and
    /// seeking to end of stream after an `END` record.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        self.read_record_raw(ReadFlags::DEFAULT)
    }

    /// Read the next record, handling only the record types in `flags`.
    pub fn read_record_raw(&mut self, flags: ReadFlags) -> Result<Option<Record>> {
        read_record_raw(&mut self.inner, &mut self.guard, &self.config, flags)
    }

    /// Seek to the offset named by a pointer payload read by the caller.
    pub fn follow_pointer(&mut self, text: &str) -> Result<()> {
        follow_pointer(&mut self.inner, &mut self.guard, text)
    }

    /// Current stream position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Seek to an absolute offset, e.g. the start of a segment.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner
            .seek(SeekFrom::Start(offset))
            .map(|_| ())
            .map_err(|source| RecordError::Seek { offset, source })
    }

    /// Iterate over the remaining records.
    ///
    /// The iterator ends at end of stream or after yielding the first error.
    pub fn records(&mut self, flags: ReadFlags) -> Records<'_, T> {
        Records {
            reader: self,
            flags,
            done: false,
        }
    }
}

/// Iterator returned by [`RecordReader::records`].
pub struct Records<'a, T> {
    reader: &'a mut RecordReader<T>,
    flags: ReadFlags,
    done: bool,
}

impl<T: Read + Seek + StreamIdentity> Iterator for Records<'_, T> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record_raw(self.flags) {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
