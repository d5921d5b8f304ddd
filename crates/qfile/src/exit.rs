use std::fmt;
use std::io;

use qfile_record::RecordError;
use qfile_stream::StreamError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const STREAM_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::AlreadyExists => FAILURE,
        io::ErrorKind::UnexpectedEof | io::ErrorKind::WriteZero => STREAM_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn stream_error(context: &str, err: StreamError) -> CliError {
    match err {
        StreamError::Open { ref source, .. } | StreamError::Create { ref source, .. } => {
            let code = io_error(context, io::Error::from(source.kind())).code;
            CliError::new(code, format!("{context}: {err}"))
        }
        StreamError::Io(source) => io_error(context, source),
    }
}

pub fn record_error(context: &str, err: RecordError) -> CliError {
    if err.is_data_error() {
        return CliError::new(DATA_INVALID, format!("{context}: {err}"));
    }
    match err {
        RecordError::Io(source) | RecordError::Write(source) => io_error(context, source),
        RecordError::Seek { .. } => CliError::new(STREAM_ERROR, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_errors_map_to_data_invalid() {
        let err = record_error("read failed", RecordError::ShortRead("payload"));
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("read failed: "));

        let err = record_error(
            "read failed",
            RecordError::LengthOutOfRange { length: 11, max: 10 },
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn io_errors_keep_their_kind() {
        let err = record_error(
            "write failed",
            RecordError::Write(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);

        let err = stream_error(
            "open failed",
            StreamError::Open {
                path: "/nope".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        );
        assert_eq!(err.code, FAILURE);
        assert!(err.message.contains("/nope"));
    }

    #[test]
    fn seek_failure_is_stream_error() {
        let err = record_error(
            "retype failed",
            RecordError::Seek {
                offset: 9,
                source: io::Error::from(io::ErrorKind::InvalidInput),
            },
        );
        assert_eq!(err.code, STREAM_ERROR);
    }
}
