/// Fast-memory mirror of the active card image

use crate::format::constants::{CARD_SIZE, FILLER_BYTE};
use std::cell::RefCell;
use std::rc::Rc;

/// Cache holding a full copy of the active card image (e.g. PSRAM)
///
/// Writes are started asynchronously; the source buffer must not be reused
/// until [`FastMirror::wait`] returns.
pub trait FastMirror {
    /// Start copying `data` to byte `offset` of the cache
    fn write_async(&mut self, offset: usize, data: &[u8]);

    /// Block until the outstanding write has completed
    fn wait(&mut self);
}

#[derive(Debug)]
struct MirrorState {
    data: Vec<u8>,
    pending: Option<(usize, Vec<u8>)>,
    completed: usize,
}

/// Mirror held in process memory
///
/// A started write becomes visible only after `wait`. Clones share the same
/// cache.
#[derive(Debug, Clone)]
pub struct MemoryMirror {
    inner: Rc<RefCell<MirrorState>>,
}

impl MemoryMirror {
    /// Create a cache sized for one card, filled with 0xFF
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MirrorState {
                data: vec![FILLER_BYTE; CARD_SIZE],
                pending: None,
                completed: 0,
            })),
        }
    }

    /// Get a copy of the cache contents
    pub fn contents(&self) -> Vec<u8> {
        self.inner.borrow().data.clone()
    }

    /// Is a write still outstanding?
    pub fn is_pending(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Number of writes that have completed
    pub fn completed_writes(&self) -> usize {
        self.inner.borrow().completed
    }
}

impl Default for MemoryMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorState {
    fn complete(&mut self) {
        if let Some((offset, bytes)) = self.pending.take() {
            let end = (offset + bytes.len()).min(self.data.len());
            if offset < end {
                self.data[offset..end].copy_from_slice(&bytes[..end - offset]);
            }
            self.completed += 1;
        }
    }
}

impl FastMirror for MemoryMirror {
    fn write_async(&mut self, offset: usize, data: &[u8]) {
        let mut state = self.inner.borrow_mut();
        // One transfer in flight at a time
        state.complete();
        state.pending = Some((offset, data.to_vec()));
    }

    fn wait(&mut self) {
        self.inner.borrow_mut().complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_visible_after_wait() {
        let mirror = MemoryMirror::new();
        let mut cache = mirror.clone();

        cache.write_async(128, &[0x55; 128]);
        assert!(mirror.is_pending());
        assert_eq!(mirror.contents()[128], FILLER_BYTE);

        cache.wait();
        assert!(!mirror.is_pending());
        assert_eq!(mirror.completed_writes(), 1);
        assert!(mirror.contents()[128..256].iter().all(|&b| b == 0x55));
    }

    #[test]
    fn test_out_of_range_write_clipped() {
        let mut mirror = MemoryMirror::new();
        mirror.write_async(CARD_SIZE - 64, &[0; 128]);
        mirror.wait();
        assert!(mirror.contents()[CARD_SIZE - 64..].iter().all(|&b| b == 0));
    }
}
