use std::borrow::Cow;
use std::ops::BitOr;

use bytes::{BufMut, Bytes, BytesMut};

use crate::varint::{encode_length, length_size};

/// Width of the payload written by [`RecordWriter::write_pointer`].
///
/// Fixed so that a pointer can be overwritten in place with another target.
///
/// [`RecordWriter::write_pointer`]: crate::writer::RecordWriter::write_pointer
pub const PTR_PAYLOAD_SIZE: usize = 15;

/// Default bound on consecutive backward pointer jumps on one stream.
pub const DEFAULT_MAX_REVERSE_JUMPS: u32 = 10_000;

/// A typed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The record type.
    pub rec_type: u8,
    /// The record payload. May contain NUL bytes.
    pub payload: Bytes,
    /// Stream offset of the type byte. Zero for records built in memory.
    pub offset: u64,
}

impl Record {
    /// Create a new record.
    pub fn new(rec_type: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            rec_type,
            payload: payload.into(),
            offset: 0,
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// The total encoded size of this record (type + length + payload).
    pub fn wire_size(&self) -> usize {
        1 + length_size(self.payload.len()) + self.payload.len()
    }

    /// The payload as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// A copy of the payload with a trailing NUL, for C-string consumers.
    pub fn nul_terminated(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload.len() + 1);
        out.extend_from_slice(&self.payload);
        out.push(0);
        out
    }
}

/// Encode a record into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬─────────────────────┬─────────────────┐
/// │ Type (1B) │ Length (1-10B)      │ Payload          │
/// │ 0..=255   │ 7-bit groups, LSB   │ (Length bytes)   │
/// │           │ first, bit 7 = more │                  │
/// └───────────┴─────────────────────┴─────────────────┘
/// ```
pub fn encode_record(rec_type: u8, payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(1 + length_size(payload.len()) + payload.len());
    dst.put_u8(rec_type);
    encode_length(payload.len(), dst);
    dst.put_slice(payload);
}

/// Which record types the reader handles on the caller's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadFlags(u8);

impl ReadFlags {
    /// Surface every record as stored.
    pub const NONE: Self = Self(0);
    /// Follow `PTR` records instead of returning them.
    pub const FOLLOW_POINTERS: Self = Self(1 << 0);
    /// Skip `DTXT` records.
    pub const SKIP_DELETED: Self = Self(1 << 1);
    /// Seek to end of stream after returning an `END` record.
    pub const SEEK_END: Self = Self(1 << 2);
    /// Everything above; what ordinary consumers want.
    pub const DEFAULT: Self = Self(Self::FOLLOW_POINTERS.0 | Self::SKIP_DELETED.0 | Self::SEEK_END.0);

    /// True if every flag in `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if no flags are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ReadFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Configuration for the record reader.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Largest accepted payload length. Zero means unbounded.
    pub max_length: usize,
    /// On an oversized length, read and discard that many bytes before
    /// reporting the error, so a caller can try to keep scanning.
    pub resync_on_oversize: bool,
    /// Backward pointer jumps tolerated on one stream.
    pub max_reverse_jumps: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_length: 0,
            resync_on_oversize: false,
            max_reverse_jumps: DEFAULT_MAX_REVERSE_JUMPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_layout() {
        let mut buf = BytesMut::new();
        encode_record(b'N', b"hello", &mut buf);
        assert_eq!(buf.as_ref(), b"N\x05hello");
    }

    #[test]
    fn encode_empty_payload() {
        let mut buf = BytesMut::new();
        encode_record(0xff, b"", &mut buf);
        assert_eq!(buf.as_ref(), [0xff, 0x00]);
    }

    #[test]
    fn encode_two_byte_length() {
        let payload = vec![b'x'; 200];
        let mut buf = BytesMut::new();
        encode_record(b'N', &payload, &mut buf);
        assert_eq!(&buf[..3], [b'N', 0xc8, 0x01]);
        assert_eq!(buf.len(), 3 + 200);
    }

    #[test]
    fn record_wire_size() {
        assert_eq!(Record::new(b'N', "").wire_size(), 2);
        assert_eq!(Record::new(b'N', "test").wire_size(), 6);
        assert_eq!(Record::new(b'N', vec![0u8; 128]).wire_size(), 131);
    }

    #[test]
    fn nul_terminated_keeps_embedded_nuls() {
        let record = Record::new(b'N', &b"a\0b"[..]);
        assert_eq!(record.len(), 3);
        assert_eq!(record.nul_terminated(), b"a\0b\0");
        assert_eq!(record.text(), "a\0b");
    }

    #[test]
    fn flags_combine() {
        let flags = ReadFlags::FOLLOW_POINTERS | ReadFlags::SEEK_END;
        assert!(flags.contains(ReadFlags::FOLLOW_POINTERS));
        assert!(!flags.contains(ReadFlags::SKIP_DELETED));
        assert!(ReadFlags::DEFAULT.contains(flags));
        assert!(ReadFlags::NONE.is_empty());
        assert_eq!(ReadFlags::default(), ReadFlags::NONE);
    }

    #[test]
    fn default_config() {
        let cfg = ReaderConfig::default();
        assert_eq!(cfg.max_length, 0);
        assert!(!cfg.resync_on_oversize);
        assert_eq!(cfg.max_reverse_jumps, 10_000);
    }
}
