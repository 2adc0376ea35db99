/// Persistent settings consumed by the card manager

/// JSON file backed settings
pub mod json;

pub use json::JsonSettings;

use crate::format::constants::{CHAN_MIN, IDX_MIN};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Card manager settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Start on the boot card when no tracked game is inserted
    pub autoboot: bool,
    /// Follow the inserted game's id to a per-game card
    pub game_id_tracking: bool,
    /// Last used boot card channel
    pub boot_channel: u8,
    /// Last used numbered card
    pub card_index: u16,
    /// Last used channel of the numbered card
    pub card_channel: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autoboot: false,
            game_id_tracking: false,
            boot_channel: CHAN_MIN,
            card_index: IDX_MIN,
            card_channel: CHAN_MIN,
        }
    }
}

/// Settings storage used by the card manager
///
/// Setters are expected to skip the write to the medium when the value is
/// unchanged, since the card manager persists on every open.
pub trait SettingsStore {
    /// Is autoboot enabled?
    fn autoboot(&self) -> bool;

    /// Enable or disable autoboot
    fn set_autoboot(&mut self, enabled: bool);

    /// Is game id tracking enabled?
    fn game_id_tracking(&self) -> bool;

    /// Enable or disable game id tracking
    fn set_game_id_tracking(&mut self, enabled: bool);

    /// Persisted boot card channel
    fn boot_channel(&self) -> u8;

    /// Persist the boot card channel
    fn set_boot_channel(&mut self, channel: u8);

    /// Persisted numbered card index
    fn card_index(&self) -> u16;

    /// Persist the numbered card index
    fn set_card_index(&mut self, index: u16);

    /// Persisted numbered card channel
    fn card_channel(&self) -> u8;

    /// Persist the numbered card channel
    fn set_card_channel(&mut self, channel: u8);
}

/// Settings held in memory
///
/// Clones share the same values.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    inner: Rc<RefCell<Settings>>,
}

impl MemorySettings {
    /// Create a store with the given initial values
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Rc::new(RefCell::new(settings)),
        }
    }

    /// Get a copy of the current values
    pub fn snapshot(&self) -> Settings {
        self.inner.borrow().clone()
    }
}

impl SettingsStore for MemorySettings {
    fn autoboot(&self) -> bool {
        self.inner.borrow().autoboot
    }

    fn set_autoboot(&mut self, enabled: bool) {
        self.inner.borrow_mut().autoboot = enabled;
    }

    fn game_id_tracking(&self) -> bool {
        self.inner.borrow().game_id_tracking
    }

    fn set_game_id_tracking(&mut self, enabled: bool) {
        self.inner.borrow_mut().game_id_tracking = enabled;
    }

    fn boot_channel(&self) -> u8 {
        self.inner.borrow().boot_channel
    }

    fn set_boot_channel(&mut self, channel: u8) {
        self.inner.borrow_mut().boot_channel = channel;
    }

    fn card_index(&self) -> u16 {
        self.inner.borrow().card_index
    }

    fn set_card_index(&mut self, index: u16) {
        self.inner.borrow_mut().card_index = index;
    }

    fn card_channel(&self) -> u8 {
        self.inner.borrow().card_channel
    }

    fn set_card_channel(&mut self, channel: u8) {
        self.inner.borrow_mut().card_channel = channel;
    }
}
