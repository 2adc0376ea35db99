/// In-memory storage backend

use super::{unknown_handle, BlockStorage, FileHandle, OpenMode};
use crate::error::Result;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{Error, ErrorKind};
use std::rc::Rc;

#[derive(Debug, Default)]
struct MemFs {
    dirs: BTreeSet<String>,
    files: BTreeMap<String, Vec<u8>>,
    handles: HashMap<u32, OpenFile>,
    next_handle: u32,
    fail_mkdir: bool,
    fail_create: bool,
    fail_seek: bool,
    write_limit: Option<usize>,
}

#[derive(Debug)]
struct OpenFile {
    path: String,
    pos: usize,
}

/// Storage held entirely in memory
///
/// Clones share the same contents, so a test can keep a handle to inspect
/// files after passing the storage to a card manager.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemFs>>,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file, replacing any previous contents
    pub fn insert_file(&self, path: &str, data: Vec<u8>) {
        self.inner.borrow_mut().files.insert(path.to_string(), data);
    }

    /// Get a copy of a file's contents
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.borrow().files.get(path).cloned()
    }

    /// Paths of all stored files, sorted
    pub fn file_paths(&self) -> Vec<String> {
        self.inner.borrow().files.keys().cloned().collect()
    }

    /// Number of currently open file handles
    pub fn open_handles(&self) -> usize {
        self.inner.borrow().handles.len()
    }

    /// Make directory creation fail silently (directories never appear)
    pub fn set_fail_mkdir(&self, fail: bool) {
        self.inner.borrow_mut().fail_mkdir = fail;
    }

    /// Make opening with [`OpenMode::Create`] fail
    pub fn set_fail_create(&self, fail: bool) {
        self.inner.borrow_mut().fail_create = fail;
    }

    /// Make every seek fail
    pub fn set_fail_seek(&self, fail: bool) {
        self.inner.borrow_mut().fail_seek = fail;
    }

    /// Cap the number of bytes any single write transfers
    pub fn set_write_limit(&self, limit: Option<usize>) {
        self.inner.borrow_mut().write_limit = limit;
    }
}

impl BlockStorage for MemoryStorage {
    fn exists(&self, path: &str) -> bool {
        let fs = self.inner.borrow();
        fs.dirs.contains(path) || fs.files.contains_key(path)
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        let mut fs = self.inner.borrow_mut();
        if fs.fail_mkdir {
            return Err(Error::new(ErrorKind::PermissionDenied, "mkdir disabled").into());
        }
        fs.dirs.insert(path.to_string());
        Ok(())
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<FileHandle> {
        let mut fs = self.inner.borrow_mut();
        match mode {
            OpenMode::Create => {
                if fs.fail_create {
                    return Err(Error::new(ErrorKind::PermissionDenied, "create disabled").into());
                }
                fs.files.insert(path.to_string(), Vec::new());
            }
            OpenMode::Existing => {
                if !fs.files.contains_key(path) {
                    return Err(Error::new(ErrorKind::NotFound, path.to_string()).into());
                }
            }
        }

        let fh = FileHandle(fs.next_handle);
        fs.next_handle = fs.next_handle.wrapping_add(1);
        fs.handles.insert(
            fh.0,
            OpenFile {
                path: path.to_string(),
                pos: 0,
            },
        );
        Ok(fh)
    }

    fn seek(&mut self, fh: FileHandle, offset: u64) -> Result<()> {
        let mut fs = self.inner.borrow_mut();
        if fs.fail_seek {
            return Err(Error::new(ErrorKind::Other, "seek disabled").into());
        }
        let file = fs.handles.get_mut(&fh.0).ok_or_else(|| unknown_handle(fh))?;
        file.pos = offset as usize;
        Ok(())
    }

    fn read(&mut self, fh: FileHandle, buf: &mut [u8]) -> Result<usize> {
        let mut fs = self.inner.borrow_mut();
        let MemFs { files, handles, .. } = &mut *fs;
        let file = handles.get_mut(&fh.0).ok_or_else(|| unknown_handle(fh))?;
        let data = files.get(&file.path).map(Vec::as_slice).unwrap_or(&[]);

        let start = file.pos.min(data.len());
        let count = buf.len().min(data.len() - start);
        buf[..count].copy_from_slice(&data[start..start + count]);
        file.pos += count;
        Ok(count)
    }

    fn write(&mut self, fh: FileHandle, buf: &[u8]) -> Result<usize> {
        let mut fs = self.inner.borrow_mut();
        let MemFs {
            files,
            handles,
            write_limit,
            ..
        } = &mut *fs;
        let file = handles.get_mut(&fh.0).ok_or_else(|| unknown_handle(fh))?;
        let data = files.entry(file.path.clone()).or_default();

        let count = write_limit.map_or(buf.len(), |limit| buf.len().min(limit));
        let end = file.pos + count;
        if data.len() < end {
            data.resize(end, 0);
        }
        data[file.pos..end].copy_from_slice(&buf[..count]);
        file.pos = end;
        Ok(count)
    }

    fn flush(&mut self, fh: FileHandle) -> Result<()> {
        if self.inner.borrow().handles.contains_key(&fh.0) {
            Ok(())
        } else {
            Err(unknown_handle(fh))
        }
    }

    fn close(&mut self, fh: FileHandle) -> Result<()> {
        self.inner
            .borrow_mut()
            .handles
            .remove(&fh.0)
            .map(|_| ())
            .ok_or_else(|| unknown_handle(fh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_contents() {
        let storage = MemoryStorage::new();
        let mut backend = storage.clone();

        let fh = backend.open("a.mcd", OpenMode::Create).unwrap();
        backend.write(fh, b"hello").unwrap();
        backend.close(fh).unwrap();

        assert_eq!(storage.file("a.mcd").unwrap(), b"hello");
        assert_eq!(storage.open_handles(), 0);
    }

    #[test]
    fn test_read_past_end() {
        let mut storage = MemoryStorage::new();
        storage.insert_file("short.mcd", vec![7; 100]);

        let fh = storage.open("short.mcd", OpenMode::Existing).unwrap();
        storage.seek(fh, 50).unwrap();
        let mut buf = [0u8; 128];
        assert_eq!(storage.read(fh, &mut buf).unwrap(), 50);
        storage.seek(fh, 500).unwrap();
        assert_eq!(storage.read(fh, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_create_truncates() {
        let mut storage = MemoryStorage::new();
        storage.insert_file("a.mcd", vec![1; 10]);

        let fh = storage.open("a.mcd", OpenMode::Create).unwrap();
        storage.close(fh).unwrap();
        assert!(storage.file("a.mcd").unwrap().is_empty());
    }

    #[test]
    fn test_failure_switches() {
        let mut storage = MemoryStorage::new();

        storage.set_fail_mkdir(true);
        assert!(storage.mkdir("MemoryCards").is_err());
        assert!(!storage.exists("MemoryCards"));

        storage.set_fail_create(true);
        assert!(storage.open("a.mcd", OpenMode::Create).is_err());
        assert!(storage.open("b.mcd", OpenMode::Existing).is_err());

        storage.set_fail_create(false);
        storage.set_write_limit(Some(4));
        let fh = storage.open("a.mcd", OpenMode::Create).unwrap();
        assert_eq!(storage.write(fh, &[0; 128]).unwrap(), 4);

        storage.set_fail_seek(true);
        assert!(storage.seek(fh, 0).is_err());
    }
}
