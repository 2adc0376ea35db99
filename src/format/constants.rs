/// Card geometry, index limits and storage layout constants

/// Size of one card sector (a PS1 "frame") in bytes
pub const SECTOR_SIZE: usize = 128;

/// Number of sectors in a card image
pub const SECTOR_COUNT: usize = 1024;

/// Total card image size in bytes (128 KiB)
pub const CARD_SIZE: usize = SECTOR_SIZE * SECTOR_COUNT;

/// Number of leading sectors filled from the empty card template
pub const TEMPLATE_SECTORS: usize = 16;

/// Size of the empty card template in bytes
pub const TEMPLATE_SIZE: usize = TEMPLATE_SECTORS * SECTOR_SIZE;

/// Fill byte for unformatted sectors
pub const FILLER_BYTE: u8 = 0xFF;

/// Card index reported by modes whose identity is not numeric
pub const CARD_IDX_SPECIAL: u16 = 0;

/// Lowest numbered card
pub const IDX_MIN: u16 = 1;

/// Lowest channel number
pub const CHAN_MIN: u8 = 1;

/// Default channel count when no per-card override exists
pub const CHAN_MAX: u8 = 8;

/// Maximum length of a folder name in bytes
pub const MAX_FOLDER_NAME_LENGTH: usize = 32;

/// Top-level directory holding all memory cards
pub const MEMORY_CARDS_DIR: &str = "MemoryCards";

/// Directory holding PS1 memory cards
pub const PS1_CARDS_DIR: &str = "MemoryCards/PS1";

/// Folder used for the boot card
pub const BOOT_FOLDER: &str = "BOOT";

/// Card name used for boot card files and channel lookups
pub const BOOT_CARD_NAME: &str = "BootCard";

/// Prefix of numbered card folders ("Card1", "Card2", ...)
pub const NORMAL_CARD_PREFIX: &str = "Card";

/// Card image file extension
pub const CARD_EXTENSION: &str = "mcd";

/// Card directory configuration file, relative to [`PS1_CARDS_DIR`]
pub const CARD_CONFIG_FILE: &str = "card_config.json";

/// Byte offset of a sector within the card image
#[inline]
pub fn sector_offset(sector: usize) -> u64 {
    (sector * SECTOR_SIZE) as u64
}
