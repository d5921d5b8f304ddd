/// Errors that can occur while reading or writing records.
///
/// A clean end of stream at a record boundary is not an error; readers
/// report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The length prefix needs more bits than a `usize` holds.
    #[error("malformed record length (exceeds {bits}-bit budget)")]
    MalformedLength { bits: u32 },

    /// The decoded length exceeds the caller's maximum.
    #[error("illegal record length {length} (max {max})")]
    LengthOutOfRange { length: usize, max: usize },

    /// The stream ended inside a record.
    #[error("unexpected end of stream reading record {0}")]
    ShortRead(&'static str),

    /// A pointer record payload is not a non-negative decimal offset.
    #[error("malformed pointer record value: {0:?}")]
    MalformedPointer(String),

    /// Seeking the underlying stream failed.
    #[error("seek to offset {offset} failed: {source}")]
    Seek {
        offset: u64,
        source: std::io::Error,
    },

    /// Too many backward pointer jumps on one stream.
    #[error("too many reverse jump records (limit {limit})")]
    TooManyReverseJumps { limit: u32 },

    /// Writing to the underlying stream failed or was short.
    #[error("record write failed: {0}")]
    Write(std::io::Error),

    /// Any other I/O error while reading.
    #[error("record I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecordError {
    /// True for errors caused by the bytes in the stream rather than by the
    /// stream itself failing.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            RecordError::MalformedLength { .. }
                | RecordError::LengthOutOfRange { .. }
                | RecordError::ShortRead(_)
                | RecordError::MalformedPointer(_)
                | RecordError::TooManyReverseJumps { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
