/// Builder for creating card managers

use super::CardManager;
use crate::config::{MemorySettings, SettingsStore};
use crate::directory::{CardDirectory, StaticDirectory};
use crate::error::{CardError, Result};
use crate::game::{GameIdentifier, StaticGame};
use crate::io::BlockStorage;
use crate::mirror::FastMirror;
use crate::notify::ChangeSink;
use crate::selection::Selection;

/// Builder for constructing card managers
///
/// Storage is required. Settings default to in-memory defaults, the
/// directory to one with no named cards or mappings, and the game service to
/// one with no game inserted. Mirroring and change notification are off
/// unless configured.
#[derive(Default)]
pub struct CardManagerBuilder {
    storage: Option<Box<dyn BlockStorage>>,
    settings: Option<Box<dyn SettingsStore>>,
    directory: Option<Box<dyn CardDirectory>>,
    game: Option<Box<dyn GameIdentifier>>,
    mirror: Option<Box<dyn FastMirror>>,
    notifier: Option<Box<dyn ChangeSink>>,
}

impl CardManagerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage holding card images
    pub fn storage<S: BlockStorage + 'static>(mut self, storage: S) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Set the settings store
    pub fn settings<S: SettingsStore + 'static>(mut self, settings: S) -> Self {
        self.settings = Some(Box::new(settings));
        self
    }

    /// Set the card directory service
    pub fn directory<D: CardDirectory + 'static>(mut self, directory: D) -> Self {
        self.directory = Some(Box::new(directory));
        self
    }

    /// Set the game identification service
    pub fn game<G: GameIdentifier + 'static>(mut self, game: G) -> Self {
        self.game = Some(Box::new(game));
        self
    }

    /// Mirror card images into a fast-memory cache
    pub fn mirror<M: FastMirror + 'static>(mut self, mirror: M) -> Self {
        self.mirror = Some(Box::new(mirror));
        self
    }

    /// Notify a sink whenever the active card image changes
    pub fn notifier<N: ChangeSink + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Build the card manager and select the startup card
    pub fn build(self) -> Result<CardManager> {
        let storage = self
            .storage
            .ok_or_else(|| CardError::config("no card storage configured"))?;

        let mut manager = CardManager {
            selection: Selection::normal(crate::format::constants::IDX_MIN, 1),
            needs_update: false,
            image: None,
            storage,
            settings: self
                .settings
                .unwrap_or_else(|| Box::new(MemorySettings::default())),
            directory: self
                .directory
                .unwrap_or_else(|| Box::new(StaticDirectory::new())),
            game: self.game.unwrap_or_else(|| Box::new(StaticGame::new())),
            mirror: self.mirror,
            notifier: self.notifier,
        };
        manager.init();
        Ok(manager)
    }
}
