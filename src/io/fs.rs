/// Host filesystem storage backend

use super::{unknown_handle, BlockStorage, FileHandle, OpenMode};
use crate::error::Result;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Storage backed by a directory on the host filesystem
#[derive(Debug)]
pub struct FsStorage {
    root: PathBuf,
    files: HashMap<u32, File>,
    next_handle: u32,
}

impl FsStorage {
    /// Create a storage rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            files: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a storage path against the root
    ///
    /// `.` and `..` segments are dropped, so the result always lies under
    /// the root.
    pub fn host_path(&self, path: &str) -> PathBuf {
        let mut host = self.root.clone();
        for part in path.split(|c: char| c == '/' || c == '\\') {
            if !matches!(part, "" | "." | "..") {
                host.push(part);
            }
        }
        host
    }

    fn file(&mut self, fh: FileHandle) -> Result<&mut File> {
        self.files.get_mut(&fh.0).ok_or_else(|| unknown_handle(fh))
    }
}

impl BlockStorage for FsStorage {
    fn exists(&self, path: &str) -> bool {
        self.host_path(path).exists()
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        match fs::create_dir(self.host_path(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<FileHandle> {
        let mut options = OpenOptions::new();
        options.read(true).write(true);
        if mode == OpenMode::Create {
            options.create(true).truncate(true);
        }

        let file = options.open(self.host_path(path))?;
        let fh = FileHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.files.insert(fh.0, file);
        Ok(fh)
    }

    fn seek(&mut self, fh: FileHandle, offset: u64) -> Result<()> {
        self.file(fh)?.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    fn read(&mut self, fh: FileHandle, buf: &mut [u8]) -> Result<usize> {
        let file = self.file(fh)?;
        let mut total = 0;
        while total < buf.len() {
            match file.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(total)
    }

    fn write(&mut self, fh: FileHandle, buf: &[u8]) -> Result<usize> {
        let file = self.file(fh)?;
        let mut total = 0;
        while total < buf.len() {
            match file.write(&buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(total)
    }

    fn flush(&mut self, fh: FileHandle) -> Result<()> {
        let file = self.file(fh)?;
        file.flush()?;
        file.sync_data()?;
        Ok(())
    }

    fn close(&mut self, fh: FileHandle) -> Result<()> {
        let mut file = self.files.remove(&fh.0).ok_or_else(|| unknown_handle(fh))?;
        file.flush()?;
        Ok(())
    }
}
