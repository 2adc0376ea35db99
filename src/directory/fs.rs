/// Directory service over a host filesystem card root

use super::{CardConfig, CardDirectory};
use crate::error::Result;
use crate::format::constants::{BOOT_FOLDER, CARD_CONFIG_FILE, PS1_CARDS_DIR};
use crate::format::path::{parse_numbered, FolderName};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory service reading folders and `card_config.json` from disk
///
/// Named cards are the sub-folders of a card root that are neither the boot
/// folder nor a numbered `Card<N>` folder, listed in name order.
#[derive(Debug, Clone)]
pub struct FsDirectory {
    root: PathBuf,
    config: CardConfig,
}

impl FsDirectory {
    /// Open the directory service for a storage root
    ///
    /// A missing configuration file yields an empty configuration.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let mut directory = Self {
            root: root.as_ref().to_path_buf(),
            config: CardConfig::default(),
        };
        directory.reload()?;
        Ok(directory)
    }

    /// Re-read the configuration file
    pub fn reload(&mut self) -> Result<()> {
        let path = self.config_path();
        self.config = match fs::read_to_string(&path) {
            Ok(text) => CardConfig::from_json(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => CardConfig::default(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(
            "Card config {}: {} mappings, {} channel overrides",
            path.display(),
            self.config.mappings.len(),
            self.config.channels.len()
        );
        Ok(())
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    fn config_path(&self) -> PathBuf {
        self.host_path(PS1_CARDS_DIR).join(CARD_CONFIG_FILE)
    }

    fn host_path(&self, path: &str) -> PathBuf {
        let mut host = self.root.clone();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            host.push(part);
        }
        host
    }

    /// Named card folders under `root`, sorted
    ///
    /// Folders whose name is not usable as a [`FolderName`] unchanged are
    /// skipped, since selecting them would open a different folder.
    pub fn list_named(&self, root: &str) -> Vec<String> {
        let path = self.host_path(root);
        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("Failed to list directory '{}': {}", path.display(), err);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name != BOOT_FOLDER && parse_numbered(name).is_none())
            .filter(|name| {
                let fits = FolderName::fits(name);
                if !fits {
                    tracing::debug!("Skipping card folder '{}': unusable name", name);
                }
                fits
            })
            .collect();
        names.sort();
        names
    }
}

impl CardDirectory for FsDirectory {
    fn card_folder(&self, game_id: &str) -> Option<String> {
        self.config.folder(game_id)
    }

    fn named_folder(&self, root: &str, n: usize) -> Option<String> {
        self.list_named(root).into_iter().nth(n)
    }

    fn max_channels(&self, _folder: &str, card_name: &str) -> u8 {
        self.config.max_channels(card_name)
    }
}
