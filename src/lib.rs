/*!
# cardman

Virtual memory card selection and storage for PS1 memory card emulators.

## Features

- Four card addressing modes (boot, named, game id and numbered cards) with
  fallback rules when stepping between cards
- Multiple channels per card, each backed by its own 128 KiB image
- Lazy creation of formatted card images, legacy boot card paths
- Optional mirroring of the active image into a fast-memory cache
- Pluggable storage, settings, directory and game identification services

## Quick Start

```rust
use cardman::{CardManager, MemorySettings, MemoryStorage, Mode, Settings};

let storage = MemoryStorage::new();
let mut cards = CardManager::builder()
    .storage(storage.clone())
    .settings(MemorySettings::new(Settings::default()))
    .build()?;

assert_eq!(cards.mode(), Mode::Normal);

// Step to Card2 and open (creating) its first channel
cards.next_card();
let report = cards.open()?;
assert_eq!(report.path, "MemoryCards/PS1/Card2/Card2-1.mcd");

// Sector I/O against the open image
let mut frame = [0u8; 128];
cards.read_sector(0, &mut frame)?;
assert_eq!(&frame[..2], b"MC");
# Ok::<(), cardman::CardError>(())
```

## Storage Layout

```text
MemoryCards/PS1/Card1/Card1-1.mcd          numbered card 1, channel 1
MemoryCards/PS1/BOOT/BootCard-2.mcd        boot card, channel 2
MemoryCards/PS1/BOOT/BootCard.mcd          boot card before channels existed
MemoryCards/PS1/SLUS-00892/SLUS-00892-1.mcd  game id card
```

## Modules

- `manager`: card manager (navigation, image store)
- `selection`: selection state and addressing modes
- `format`: card geometry, template and paths
- `io`: block storage backends
- `config`: persistent settings
- `directory`: card folder lookup
- `error`: error types and Result alias
*/

#![warn(missing_docs)]

/// Persistent settings
pub mod config;
/// Card folder lookup service
pub mod directory;
/// Error types and Result alias
pub mod error;
/// Card geometry, template and storage paths
pub mod format;
/// Game identification service
pub mod game;
/// Block storage backends
pub mod io;
/// Card manager
pub mod manager;
/// Fast-memory mirror
pub mod mirror;
/// Card change notifications
pub mod notify;
/// Selection state
pub mod selection;

// Re-export common types
pub use config::{JsonSettings, MemorySettings, Settings, SettingsStore};
pub use directory::{CardConfig, CardDirectory, FsDirectory, StaticDirectory};
pub use error::{CardError, ErrorCategory, FatalSink, PanicSink, Result};
pub use format::constants::{CARD_IDX_SPECIAL, CARD_SIZE, SECTOR_COUNT, SECTOR_SIZE};
pub use format::FolderName;
pub use game::{GameIdentifier, StaticGame};
pub use io::{BlockStorage, FileHandle, FsStorage, MemoryStorage, OpenMode};
pub use manager::{CardManager, CardManagerBuilder, OpenReport};
pub use mirror::{FastMirror, MemoryMirror};
pub use notify::{ChangeCounter, ChangeSink};
pub use selection::{CardMode, Mode, Selection};
