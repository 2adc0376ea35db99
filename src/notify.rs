/// Card change notifications

use std::cell::Cell;
use std::rc::Rc;

/// Consumer of "the active card image changed" notifications
///
/// The console-facing protocol layer uses this to drop any cached card state.
pub trait ChangeSink {
    /// The active card image was replaced or recreated
    fn card_changed(&mut self);
}

impl<F: FnMut()> ChangeSink for F {
    fn card_changed(&mut self) {
        self()
    }
}

/// Change sink that counts notifications
///
/// Clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct ChangeCounter {
    count: Rc<Cell<usize>>,
}

impl ChangeCounter {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications received
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl ChangeSink for ChangeCounter {
    fn card_changed(&mut self) {
        self.count.set(self.count.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_shared() {
        let counter = ChangeCounter::new();
        let mut sink = counter.clone();
        sink.card_changed();
        sink.card_changed();
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_closure_sink() {
        let mut fired = 0;
        {
            let mut sink = || fired += 1;
            sink.card_changed();
        }
        assert_eq!(fired, 1);
    }
}
