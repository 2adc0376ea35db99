/// Game identification service

use std::cell::RefCell;
use std::rc::Rc;

/// Reports the game currently inserted in the console
pub trait GameIdentifier {
    /// Parent id of the current game (e.g. "SLUS-00892"), or `None` if unknown
    fn current_parent_id(&self) -> Option<String>;
}

/// Game identifier with a settable current game
///
/// Clones share the same current game.
#[derive(Debug, Clone, Default)]
pub struct StaticGame {
    current: Rc<RefCell<Option<String>>>,
}

impl StaticGame {
    /// Create with no game inserted
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a game inserted
    pub fn with_id(id: &str) -> Self {
        let game = Self::new();
        game.insert(id);
        game
    }

    /// Set the current game; an empty id means no game
    pub fn insert(&self, id: &str) {
        *self.current.borrow_mut() = Some(id.to_string()).filter(|id| !id.is_empty());
    }

    /// Remove the current game
    pub fn eject(&self) {
        *self.current.borrow_mut() = None;
    }
}

impl GameIdentifier for StaticGame {
    fn current_parent_id(&self) -> Option<String> {
        self.current.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_eject() {
        let game = StaticGame::new();
        let service = game.clone();
        assert_eq!(service.current_parent_id(), None);

        game.insert("SCUS-94163");
        assert_eq!(service.current_parent_id().as_deref(), Some("SCUS-94163"));

        game.insert("");
        assert_eq!(service.current_parent_id(), None);

        game.insert("SLUS-00892");
        game.eject();
        assert_eq!(service.current_parent_id(), None);
    }
}
