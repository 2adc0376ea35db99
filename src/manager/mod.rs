/// Card manager: selection, fallback resolution and the card image store

/// Builder for card managers
pub mod builder;
/// Mode entry points and navigation
mod resolver;
/// Card image lifecycle and sector I/O
mod store;

pub use builder::CardManagerBuilder;
pub use store::OpenReport;

use crate::config::SettingsStore;
use crate::directory::CardDirectory;
use crate::game::GameIdentifier;
use crate::io::{BlockStorage, FileHandle};
use crate::mirror::FastMirror;
use crate::notify::ChangeSink;
use crate::selection::{Mode, Selection};

/// Owner of the card selection and the open card image
///
/// All operations run to completion on the caller's thread. Callers must not
/// interleave navigation with an in-progress [`CardManager::open`].
pub struct CardManager {
    pub(crate) selection: Selection,
    pub(crate) needs_update: bool,
    pub(crate) image: Option<OpenImage>,
    pub(crate) storage: Box<dyn BlockStorage>,
    pub(crate) settings: Box<dyn SettingsStore>,
    pub(crate) directory: Box<dyn CardDirectory>,
    pub(crate) game: Box<dyn GameIdentifier>,
    pub(crate) mirror: Option<Box<dyn FastMirror>>,
    pub(crate) notifier: Option<Box<dyn ChangeSink>>,
}

/// The currently open card image
#[derive(Debug)]
pub(crate) struct OpenImage {
    pub(crate) handle: FileHandle,
    pub(crate) path: String,
}

impl CardManager {
    /// Create a new builder for constructing card managers
    pub fn builder() -> CardManagerBuilder {
        CardManagerBuilder::new()
    }

    /// Get the current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Get the addressing mode
    pub fn mode(&self) -> Mode {
        self.selection.mode()
    }

    /// Card number in Normal mode, the special index otherwise
    pub fn card_index(&self) -> u16 {
        self.selection.card_index()
    }

    /// Get the channel
    pub fn channel(&self) -> u8 {
        self.selection.channel()
    }

    /// Get the folder name
    pub fn folder_name(&self) -> &str {
        self.selection.folder_name().as_str()
    }

    /// Has the selection changed since the last open?
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Is a card image open?
    pub fn is_open(&self) -> bool {
        self.image.is_some()
    }

    /// Path of the open card image
    pub fn current_path(&self) -> Option<&str> {
        self.image.as_ref().map(|image| image.path.as_str())
    }

    /// Get the settings store
    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    /// Get a mutable reference to the settings store
    pub fn settings_mut(&mut self) -> &mut dyn SettingsStore {
        self.settings.as_mut()
    }

    pub(crate) fn notify_changed(&mut self) {
        if let Some(notifier) = self.notifier.as_mut() {
            notifier.card_changed();
        }
    }
}

impl Drop for CardManager {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Failed to close card image: {}", e);
        }
    }
}

impl std::fmt::Debug for CardManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardManager")
            .field("selection", &self.selection)
            .field("needs_update", &self.needs_update)
            .field("image", &self.image)
            .field("mirror", &self.mirror.is_some())
            .finish()
    }
}
