use std::path::PathBuf;

/// Errors that can occur while opening or driving a queue-file stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Failed to open an existing file.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create a new file.
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;
