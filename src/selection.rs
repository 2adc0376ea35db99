/// Card selection state

use crate::format::constants::*;
use crate::format::path::{boot_card_path, card_path, FolderName};
use std::fmt;

/// Card addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Boot card, used when autoboot is enabled
    Boot,
    /// Card folder picked from the named card listing
    Named,
    /// Per-game card following the inserted game's id
    GameId,
    /// Numbered card ("Card1", "Card2", ...)
    Normal,
}

impl Mode {
    /// Get the mode name
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Boot => "Boot",
            Mode::Named => "Named",
            Mode::GameId => "GameId",
            Mode::Normal => "Normal",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mode together with the state only that mode needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardMode {
    /// Boot card
    Boot,
    /// Named card; `cursor` is the 1-based position in the named listing
    Named {
        /// Number of listing entries consumed to reach this card
        cursor: usize,
    },
    /// Per-game card
    GameId,
    /// Numbered card
    Normal {
        /// Card number, at least [`IDX_MIN`]
        index: u16,
    },
}

impl CardMode {
    /// Get the addressing mode
    pub fn mode(&self) -> Mode {
        match self {
            CardMode::Boot => Mode::Boot,
            CardMode::Named { .. } => Mode::Named,
            CardMode::GameId => Mode::GameId,
            CardMode::Normal { .. } => Mode::Normal,
        }
    }
}

/// The card and channel presented to the console
///
/// Only the card manager changes a selection. The folder name is always
/// derived together with the mode, so the two never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    card: CardMode,
    channel: u8,
    folder: FolderName,
}

impl Selection {
    pub(crate) fn boot(channel: u8) -> Self {
        Self {
            card: CardMode::Boot,
            channel,
            folder: FolderName::boot(),
        }
    }

    pub(crate) fn game_id(folder: FolderName) -> Self {
        Self {
            card: CardMode::GameId,
            channel: CHAN_MIN,
            folder,
        }
    }

    pub(crate) fn named(cursor: usize, folder: FolderName) -> Self {
        Self {
            card: CardMode::Named { cursor },
            channel: CHAN_MIN,
            folder,
        }
    }

    pub(crate) fn normal(index: u16, channel: u8) -> Self {
        let index = index.max(IDX_MIN);
        Self {
            card: CardMode::Normal { index },
            channel,
            folder: FolderName::numbered(index),
        }
    }

    pub(crate) fn set_channel(&mut self, channel: u8) {
        self.channel = channel;
    }

    /// Get the mode and its state
    pub fn card(&self) -> CardMode {
        self.card
    }

    /// Get the addressing mode
    pub fn mode(&self) -> Mode {
        self.card.mode()
    }

    /// Card number in Normal mode, [`CARD_IDX_SPECIAL`] otherwise
    pub fn card_index(&self) -> u16 {
        match self.card {
            CardMode::Normal { index } => index,
            _ => CARD_IDX_SPECIAL,
        }
    }

    /// Position in the named card listing, if in Named mode
    pub fn named_cursor(&self) -> Option<usize> {
        match self.card {
            CardMode::Named { cursor } => Some(cursor),
            _ => None,
        }
    }

    /// Get the channel
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Get the folder name
    pub fn folder_name(&self) -> &FolderName {
        &self.folder
    }

    /// Base name of the card's image files, also the channel lookup key
    pub fn card_name(&self) -> &str {
        match self.card {
            CardMode::Boot => BOOT_CARD_NAME,
            _ => self.folder.as_str(),
        }
    }

    /// Image path of the selected channel, without legacy fallbacks
    pub fn image_path(&self) -> String {
        match self.card {
            CardMode::Boot => boot_card_path(self.channel),
            _ => card_path(&self.folder, self.channel),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.card {
            CardMode::Normal { index } => {
                write!(f, "{} card {} channel {}", self.mode(), index, self.channel)
            }
            _ => write!(
                f,
                "{} card {} channel {}",
                self.mode(),
                self.folder,
                self.channel
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_selection() {
        let selection = Selection::normal(5, 2);
        assert_eq!(selection.mode(), Mode::Normal);
        assert_eq!(selection.card_index(), 5);
        assert_eq!(selection.folder_name().as_str(), "Card5");
        assert_eq!(selection.image_path(), "MemoryCards/PS1/Card5/Card5-2.mcd");
        assert_eq!(selection.to_string(), "Normal card 5 channel 2");
    }

    #[test]
    fn test_normal_never_sentinel() {
        let selection = Selection::normal(CARD_IDX_SPECIAL, 1);
        assert_eq!(selection.card_index(), IDX_MIN);
        assert_eq!(selection.folder_name().as_str(), "Card1");
    }

    #[test]
    fn test_special_modes_report_sentinel() {
        let boot = Selection::boot(3);
        assert_eq!(boot.card_index(), CARD_IDX_SPECIAL);
        assert_eq!(boot.card_name(), "BootCard");
        assert_eq!(boot.image_path(), "MemoryCards/PS1/BOOT/BootCard-3.mcd");

        let named = Selection::named(2, FolderName::new("Saves"));
        assert_eq!(named.card_index(), CARD_IDX_SPECIAL);
        assert_eq!(named.named_cursor(), Some(2));
        assert_eq!(named.channel(), CHAN_MIN);

        let game = Selection::game_id(FolderName::new("SLUS-00892"));
        assert_eq!(game.card_index(), CARD_IDX_SPECIAL);
        assert_eq!(game.card_name(), "SLUS-00892");
        assert_eq!(game.named_cursor(), None);
    }
}
