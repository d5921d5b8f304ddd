use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, StreamError};
use crate::traits::StreamIdentity;

/// A queue file on disk.
///
/// Reads go through an internal buffer, which is dropped on every seek and
/// before every write so the file position always matches what the caller
/// has consumed.
///
/// The identity is the path the file was opened with, exactly as given, so
/// two opens of the same path compare equal.
pub struct QueueFile {
    file: BufReader<File>,
    path: PathBuf,
    identity: String,
}

impl QueueFile {
    /// Default permission mode for newly created queue files.
    pub const DEFAULT_FILE_MODE: u32 = 0o600;

    /// Open an existing file for reading only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| StreamError::Open {
            path: path.clone(),
            source: e,
        })?;
        debug!(?path, "opened queue file read-only");
        Ok(Self::from_parts(file, path))
    }

    /// Open an existing file for reading and writing.
    pub fn open_rw(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| StreamError::Open {
                path: path.clone(),
                source: e,
            })?;
        debug!(?path, "opened queue file read-write");
        Ok(Self::from_parts(file, path))
    }

    /// Create a new file for reading and writing. Fails if the path exists.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with_mode(path, Self::DEFAULT_FILE_MODE)
    }

    /// Create a new file with an explicit permission mode (ignored off Unix).
    pub fn create_with_mode(path: impl AsRef<Path>, mode: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.read(true).write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        let file = options.open(&path).map_err(|e| StreamError::Create {
            path: path.clone(),
            source: e,
        })?;
        debug!(?path, "created queue file");
        Ok(Self::from_parts(file, path))
    }

    /// Open for appending records, creating the file when it does not exist.
    ///
    /// The returned stream is positioned at end of file.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(Self::DEFAULT_FILE_MODE);
        }

        let file = options.open(&path).map_err(|e| StreamError::Open {
            path: path.clone(),
            source: e,
        })?;
        debug!(?path, "opened queue file for append");
        let mut file = Self::from_parts(file, path);
        file.seek(SeekFrom::End(0))?;
        Ok(file)
    }

    fn from_parts(file: File, path: PathBuf) -> Self {
        let identity = identity_of(&path);
        Self {
            file: BufReader::new(file),
            path,
            identity,
        }
    }

    /// Drop buffered read-ahead, moving the file back to the logical position.
    fn discard_buffer(&mut self) -> std::io::Result<()> {
        if !self.file.buffer().is_empty() {
            self.file.seek(SeekFrom::Current(0))?;
        }
        Ok(())
    }

    /// The path this stream was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current size of the file in bytes.
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.get_ref().metadata()?.len())
    }

    /// Whether the file is currently empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Flush written data and metadata to disk.
    pub fn sync_all(&self) -> Result<()> {
        self.file.get_ref().sync_all().map_err(Into::into)
    }

    /// Truncate the file to `size` bytes, e.g. to drop a partial record.
    pub fn truncate(&mut self, size: u64) -> Result<()> {
        self.discard_buffer()?;
        self.file.get_ref().set_len(size).map_err(Into::into)
    }

    /// Borrow the underlying file.
    pub fn get_ref(&self) -> &File {
        self.file.get_ref()
    }

    /// Consume the stream and return the underlying file, positioned where
    /// the caller stopped reading.
    pub fn into_inner(mut self) -> Result<File> {
        self.discard_buffer()?;
        Ok(self.file.into_inner())
    }
}

impl Read for QueueFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for QueueFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.discard_buffer()?;
        self.file.get_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.get_mut().flush()
    }
}

impl Seek for QueueFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }

    fn stream_position(&mut self) -> std::io::Result<u64> {
        self.file.stream_position()
    }
}

/// Stream identity for a path: printable ASCII as is, every other byte
/// (backslashes and quotes included) escaped. Paths that are not valid UTF-8
/// still map to distinct identities.
fn identity_of(path: &Path) -> String {
    path.as_os_str().as_encoded_bytes().escape_ascii().to_string()
}

impl StreamIdentity for QueueFile {
    fn identity(&self) -> &str {
        &self.identity
    }
}

impl std::fmt::Debug for QueueFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueFile")
            .field("path", &self.path)
            .finish()
    }
}
