/// Folder names and card image paths

use super::constants::*;
use std::fmt;

/// Bounded folder name identifying a card's storage location
///
/// Names longer than [`MAX_FOLDER_NAME_LENGTH`] bytes are truncated at the
/// last character boundary that fits. A folder name is a single path
/// component: separators become `_`, as does a name made only of dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FolderName(String);

impl FolderName {
    /// Create a folder name, truncating it to the maximum length
    pub fn new(name: &str) -> Self {
        let mut end = name.len().min(MAX_FOLDER_NAME_LENGTH);
        while !name.is_char_boundary(end) {
            end -= 1;
        }

        let name = &name[..end];
        if !name.is_empty() && name.bytes().all(|b| b == b'.') {
            return Self("_".repeat(name.len()));
        }
        Self(name.replace(|c: char| c == '/' || c == '\\', "_"))
    }

    /// Does `name` fit a folder name as is, without truncation or
    /// replacement?
    pub fn fits(name: &str) -> bool {
        !name.is_empty() && Self::new(name).as_str() == name
    }

    /// Folder name of the boot card
    pub fn boot() -> Self {
        Self::new(BOOT_FOLDER)
    }

    /// Folder name of a numbered card ("Card<index>")
    pub fn numbered(index: u16) -> Self {
        Self::new(&format!("{}{}", NORMAL_CARD_PREFIX, index))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Is the name empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FolderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Directory holding all channels of a card
pub fn card_dir(folder: &FolderName) -> String {
    format!("{}/{}", PS1_CARDS_DIR, folder)
}

/// Image path of one channel of a named, game id or numbered card
pub fn card_path(folder: &FolderName, channel: u8) -> String {
    format!(
        "{}/{}/{}-{}.{}",
        PS1_CARDS_DIR, folder, folder, channel, CARD_EXTENSION
    )
}

/// Image path of one channel of the boot card
pub fn boot_card_path(channel: u8) -> String {
    format!(
        "{}/{}/{}-{}.{}",
        PS1_CARDS_DIR, BOOT_FOLDER, BOOT_CARD_NAME, channel, CARD_EXTENSION
    )
}

/// Image path used by the boot card before it had channels
pub fn legacy_boot_card_path() -> String {
    format!(
        "{}/{}/{}.{}",
        PS1_CARDS_DIR, BOOT_FOLDER, BOOT_CARD_NAME, CARD_EXTENSION
    )
}

/// Parse the index of a numbered card folder ("Card12" -> 12)
pub fn parse_numbered(name: &str) -> Option<u16> {
    let digits = name.strip_prefix(NORMAL_CARD_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
