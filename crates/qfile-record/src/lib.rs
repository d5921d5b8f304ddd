//! Variable-length typed records with pointer indirection.
//!
//! This is the on-disk representation of mail queue files. Every record is:
//! - A 1-byte record type
//! - The payload length as little-endian 7-bit groups with a continuation bit
//! - Exactly that many payload bytes
//!
//! A pointer record (`PTR`) redirects reading to another file offset, which
//! lets a writer patch a file by appending new records and pointing at them.
//! The reader follows pointers, skips deleted text and honours end markers
//! transparently unless asked not to.

pub mod codec;
pub mod error;
pub mod pointer;
pub mod reader;
pub mod rec_type;
pub mod varint;
pub mod writer;

pub use codec::{
    encode_record, ReadFlags, ReaderConfig, Record, DEFAULT_MAX_REVERSE_JUMPS, PTR_PAYLOAD_SIZE,
};
pub use error::{RecordError, Result};
pub use pointer::{follow_pointer, parse_pointer, LoopGuard};
pub use reader::{read_record_raw, RecordReader, Records};
pub use rec_type::type_name;
pub use writer::RecordWriter;
