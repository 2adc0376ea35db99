/// JSON settings file

use super::{Settings, SettingsStore};
use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Settings persisted to a JSON file
///
/// The file is rewritten only when a setter changes a value. Write failures
/// are logged and the in-memory value is kept.
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    settings: Settings,
}

impl JsonSettings {
    /// Load settings from `path`, using defaults if the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let settings = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, settings })
    }

    /// Get the settings file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current values
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Write the settings file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.settings)?)?;
        Ok(())
    }

    fn update<F: FnOnce(&mut Settings)>(&mut self, f: F) {
        let before = self.settings.clone();
        f(&mut self.settings);
        if self.settings != before {
            if let Err(e) = self.save() {
                tracing::warn!("Failed to save settings to {}: {}", self.path.display(), e);
            }
        }
    }
}

impl SettingsStore for JsonSettings {
    fn autoboot(&self) -> bool {
        self.settings.autoboot
    }

    fn set_autoboot(&mut self, enabled: bool) {
        self.update(|s| s.autoboot = enabled);
    }

    fn game_id_tracking(&self) -> bool {
        self.settings.game_id_tracking
    }

    fn set_game_id_tracking(&mut self, enabled: bool) {
        self.update(|s| s.game_id_tracking = enabled);
    }

    fn boot_channel(&self) -> u8 {
        self.settings.boot_channel
    }

    fn set_boot_channel(&mut self, channel: u8) {
        self.update(|s| s.boot_channel = channel);
    }

    fn card_index(&self) -> u16 {
        self.settings.card_index
    }

    fn set_card_index(&mut self, index: u16) {
        self.update(|s| s.card_index = index);
    }

    fn card_channel(&self) -> u8 {
        self.settings.card_channel
    }

    fn set_card_channel(&mut self, channel: u8) {
        self.update(|s| s.card_channel = channel);
    }
}
