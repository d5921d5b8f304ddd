//! Random-access byte streams for queue-file records.
//!
//! The record codec needs very little from the stream it works on: read,
//! write, absolute seek, the current position, and a stable name that tells
//! two streams apart. `Read`, `Write` and `Seek` cover the first four; the
//! [`StreamIdentity`] trait provided here covers the last.
//!
//! Two implementations ship with the crate:
//! - [`QueueFile`]: a file on disk, identified by its path
//! - [`MemoryStream`]: an in-memory buffer with a caller-chosen name

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{Result, StreamError};
pub use file::QueueFile;
pub use memory::MemoryStream;
pub use traits::StreamIdentity;
