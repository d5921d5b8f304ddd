//! Record length encoding.
//!
//! Lengths are written as little-endian groups of 7 bits. Bit 7 of each byte
//! is set when another group follows:
//!
//! ```text
//!     0 -> 00
//!   127 -> 7f
//!   128 -> 80 01
//!   300 -> ac 02
//! ```
//!
//! The encoding is always minimal, and a length of zero is one zero byte.

use std::io::{ErrorKind, Read};

use bytes::{BufMut, BytesMut};

use crate::error::{RecordError, Result};

/// Most groups a length can occupy on this platform.
pub const MAX_LENGTH_GROUPS: usize = usize::BITS.div_ceil(7) as usize;

const DATA_MASK: u8 = 0x7f;
const MORE_FOLLOWS: u8 = 0x80;

/// Append the encoding of `length` to `dst`.
pub fn encode_length(mut length: usize, dst: &mut BytesMut) {
    dst.reserve(length_size(length));
    loop {
        let mut group = (length & DATA_MASK as usize) as u8;
        length >>= 7;
        if length != 0 {
            group |= MORE_FOLLOWS;
        }
        dst.put_u8(group);
        if length == 0 {
            return;
        }
    }
}

/// Number of bytes [`encode_length`] emits for `length`.
pub fn length_size(length: usize) -> usize {
    let bits = usize::BITS - length.leading_zeros();
    (bits.div_ceil(7) as usize).max(1)
}

/// Decode a length from `src`.
///
/// Fails with [`RecordError::MalformedLength`] when the encoding runs past
/// the width of `usize` or its last group holds bits that do not fit, and with [`RecordError::ShortRead`] when the stream
/// ends before the last group.
pub fn decode_length<R: Read + ?Sized>(src: &mut R) -> Result<usize> {
    let mut length = 0usize;
    let mut shift = 0u32;
    loop {
        if shift >= usize::BITS {
            return Err(RecordError::MalformedLength { bits: usize::BITS });
        }
        let group = read_byte(src)?.ok_or(RecordError::ShortRead("length"))?;
        let data = usize::from(group & DATA_MASK);
        // The top group may only carry the bits still left in a usize.
        if shift > 0 && data >> (usize::BITS - shift) != 0 {
            return Err(RecordError::MalformedLength { bits: usize::BITS });
        }
        length |= data << shift;
        if group & MORE_FOLLOWS == 0 {
            return Ok(length);
        }
        shift += 7;
    }
}

/// Read one byte, retrying interrupted reads. `None` means end of stream.
pub(crate) fn read_byte<R: Read + ?Sized>(src: &mut R) -> std::io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match src.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}
