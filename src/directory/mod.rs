/// Card folder lookup: game id mappings, named cards and channel counts

/// Host filesystem directory service
pub mod fs;

pub use fs::FsDirectory;

use crate::format::constants::{CHAN_MAX, CHAN_MIN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directory service consulted when resolving card selections
///
/// A `None` result is a lookup miss and is never an error.
pub trait CardDirectory {
    /// Folder holding the card for a game id, if one is configured
    fn card_folder(&self, game_id: &str) -> Option<String>;

    /// Name of the `n`th (0-based) named card folder under `root`
    fn named_folder(&self, root: &str, n: usize) -> Option<String>;

    /// Number of channels available for a card
    ///
    /// `card_name` is the image base name: the folder name for most cards,
    /// "BootCard" for the boot card.
    fn max_channels(&self, folder: &str, card_name: &str) -> u8;
}

/// Card configuration: game id to folder mappings and channel counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Game id to folder name
    pub mappings: BTreeMap<String, String>,
    /// Card name to channel count
    pub channels: BTreeMap<String, u8>,
}

impl CardConfig {
    /// Parse a configuration from JSON
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Mapped folder for a game id, ignoring empty mappings
    pub fn folder(&self, game_id: &str) -> Option<String> {
        self.mappings
            .get(game_id)
            .filter(|folder| !folder.is_empty())
            .cloned()
    }

    /// Channel count for a card name, defaulting to [`CHAN_MAX`]
    pub fn max_channels(&self, card_name: &str) -> u8 {
        self.channels
            .get(card_name)
            .copied()
            .unwrap_or(CHAN_MAX)
            .max(CHAN_MIN)
    }
}

/// Directory service with a fixed list of named cards
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    named: Vec<String>,
    config: CardConfig,
}

impl StaticDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the named card folders, in listing order
    pub fn named<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.named = names.into_iter().map(Into::into).collect();
        self
    }

    /// Map a game id to a folder
    pub fn mapping(mut self, game_id: &str, folder: &str) -> Self {
        self.config
            .mappings
            .insert(game_id.to_string(), folder.to_string());
        self
    }

    /// Set the channel count of a card
    pub fn channels(mut self, card_name: &str, count: u8) -> Self {
        self.config.channels.insert(card_name.to_string(), count);
        self
    }
}

impl CardDirectory for StaticDirectory {
    fn card_folder(&self, game_id: &str) -> Option<String> {
        self.config.folder(game_id)
    }

    fn named_folder(&self, _root: &str, n: usize) -> Option<String> {
        self.named.get(n).cloned()
    }

    fn max_channels(&self, _folder: &str, card_name: &str) -> u8 {
        self.config.max_channels(card_name)
    }
}
