/// Block storage backends for card images

/// Host filesystem backend
pub mod fs;
/// In-memory backend
pub mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

use crate::error::Result;

/// Handle to a file opened through a [`BlockStorage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(pub u32);

/// How to open a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read/write; create the file and truncate it to zero length
    Create,
    /// Read/write; the file must already exist
    Existing,
}

/// Path-addressed storage medium holding card images
///
/// Paths are `/`-separated and relative to the medium's root. `read` and
/// `write` report the number of bytes actually transferred; callers decide
/// whether a short transfer is an error.
pub trait BlockStorage {
    /// Does a file or directory exist at `path`?
    fn exists(&self, path: &str) -> bool;

    /// Create a directory; succeeds if it already exists
    fn mkdir(&mut self, path: &str) -> Result<()>;

    /// Open a file
    fn open(&mut self, path: &str, mode: OpenMode) -> Result<FileHandle>;

    /// Move the file position to an absolute byte offset
    fn seek(&mut self, fh: FileHandle, offset: u64) -> Result<()>;

    /// Read up to `buf.len()` bytes from the current position
    fn read(&mut self, fh: FileHandle, buf: &mut [u8]) -> Result<usize>;

    /// Write up to `buf.len()` bytes at the current position
    fn write(&mut self, fh: FileHandle, buf: &[u8]) -> Result<usize>;

    /// Flush pending writes to the medium
    fn flush(&mut self, fh: FileHandle) -> Result<()>;

    /// Flush and release a file handle
    fn close(&mut self, fh: FileHandle) -> Result<()>;
}

pub(crate) fn unknown_handle(fh: FileHandle) -> crate::error::CardError {
    std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("unknown file handle {}", fh.0),
    )
    .into()
}
