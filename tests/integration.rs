/// Integration tests for cardman

use cardman::format::template_sector;
use cardman::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_init_defaults_to_normal_card() {
    let settings = Settings {
        autoboot: false,
        game_id_tracking: false,
        card_index: 12,
        card_channel: 4,
        ..Settings::default()
    };
    let cards = CardManager::builder()
        .storage(MemoryStorage::new())
        .settings(MemorySettings::new(settings))
        .game(StaticGame::with_id("SLUS-00892"))
        .build()
        .expect("Failed to build manager");

    assert_eq!(cards.mode(), Mode::Normal);
    assert_eq!(cards.card_index(), 12);
    assert_eq!(cards.channel(), 4);
    assert_eq!(cards.folder_name(), "Card12");
}

#[test]
fn test_init_selects_tracked_game() {
    let settings = Settings {
        autoboot: true,
        game_id_tracking: true,
        boot_channel: 3,
        ..Settings::default()
    };
    let cards = CardManager::builder()
        .storage(MemoryStorage::new())
        .settings(MemorySettings::new(settings))
        .directory(StaticDirectory::new())
        .game(StaticGame::with_id("ABCD12345"))
        .build()
        .expect("Failed to build manager");

    assert_eq!(cards.mode(), Mode::GameId);
    assert_eq!(cards.channel(), 1);
    assert_eq!(cards.folder_name(), "ABCD12345");
    assert_eq!(cards.card_index(), CARD_IDX_SPECIAL);
}

#[test]
fn test_init_selects_mapped_game_folder() {
    let settings = Settings {
        game_id_tracking: true,
        ..Settings::default()
    };
    let cards = CardManager::builder()
        .storage(MemoryStorage::new())
        .settings(MemorySettings::new(settings))
        .directory(StaticDirectory::new().mapping("ABCD12345", "Shared"))
        .game(StaticGame::with_id("ABCD12345"))
        .build()
        .expect("Failed to build manager");

    assert_eq!(cards.mode(), Mode::GameId);
    assert_eq!(cards.folder_name(), "Shared");
}

#[test]
fn test_next_channel_full_wraparound() {
    let directory = StaticDirectory::new().channels("Card1", 5);
    let mut cards = CardManager::builder()
        .storage(MemoryStorage::new())
        .directory(directory)
        .build()
        .expect("Failed to build manager");

    let max = cards.max_channels();
    assert_eq!(max, 5);
    for _ in 0..max {
        cards.next_channel();
    }
    assert_eq!(cards.channel(), 1);
}

#[test]
fn test_new_image_layout() {
    let storage = MemoryStorage::new();
    let mut cards = CardManager::builder()
        .storage(storage.clone())
        .build()
        .expect("Failed to build manager");

    cards.open().expect("Failed to open card");

    let mut buf = [0u8; SECTOR_SIZE];
    for sector in 0..SECTOR_COUNT {
        cards.read_sector(sector, &mut buf).expect("Failed to read sector");
        match template_sector(sector) {
            Some(expected) => assert_eq!(&buf[..], expected, "sector {}", sector),
            None => assert!(buf.iter().all(|&b| b == 0xFF), "sector {}", sector),
        }
    }
    assert!(template_sector(15).is_some());
    assert!(template_sector(16).is_none());
}

#[test]
fn test_boot_card_created_at_per_channel_path() {
    let storage = MemoryStorage::new();
    let settings = Settings {
        autoboot: true,
        boot_channel: 1,
        ..Settings::default()
    };
    let mut cards = CardManager::builder()
        .storage(storage.clone())
        .settings(MemorySettings::new(settings))
        .build()
        .expect("Failed to build manager");
    assert_eq!(cards.mode(), Mode::Boot);

    let report = cards.open().expect("Failed to open card");
    assert!(report.created);
    assert_eq!(report.path, "MemoryCards/PS1/BOOT/BootCard-1.mcd");
    assert!(storage.file("MemoryCards/PS1/BOOT/BootCard.mcd").is_none());
    assert_eq!(
        storage.file_paths(),
        vec!["MemoryCards/PS1/BOOT/BootCard-1.mcd".to_string()]
    );
}

#[test]
fn test_sector_round_trip_on_disk() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    {
        let mut cards = CardManager::builder()
            .storage(FsStorage::new(root))
            .build()
            .expect("Failed to build manager");

        let report = cards.open().expect("Failed to open card");
        assert!(report.created);

        let data = [0xA5; SECTOR_SIZE];
        cards.write_sector(100, &data).expect("Failed to write sector");

        let mut buf = [0u8; SECTOR_SIZE];
        cards.read_sector(100, &mut buf).expect("Failed to read sector");
        assert_eq!(buf, data);
        cards.close().expect("Failed to close card");
    }

    let image = fs::read(root.join("MemoryCards/PS1/Card1/Card1-1.mcd")).expect("Missing image");
    assert_eq!(image.len(), CARD_SIZE);
    assert!(image[100 * SECTOR_SIZE..101 * SECTOR_SIZE]
        .iter()
        .all(|&b| b == 0xA5));

    // Reopening keeps the written data
    let mut cards = CardManager::builder()
        .storage(FsStorage::new(root))
        .build()
        .expect("Failed to build manager");
    let report = cards.open().expect("Failed to open card");
    assert!(!report.created);

    let mut buf = [0u8; SECTOR_SIZE];
    cards.read_sector(100, &mut buf).expect("Failed to read sector");
    assert_eq!(buf, [0xA5; SECTOR_SIZE]);
}

#[test]
fn test_named_cards_from_disk() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    for folder in ["Alpha", "Beta", "Card3", "BOOT"] {
        fs::create_dir_all(root.join("MemoryCards/PS1").join(folder)).expect("mkdir");
    }

    let directory = FsDirectory::open(root).expect("Failed to open directory");
    let mut cards = CardManager::builder()
        .storage(FsStorage::new(root))
        .directory(directory)
        .build()
        .expect("Failed to build manager");

    cards.prev_card();
    assert_eq!(cards.mode(), Mode::Named);
    assert_eq!(cards.folder_name(), "Alpha");

    cards.prev_card();
    assert_eq!(cards.folder_name(), "Beta");

    let report = cards.open().expect("Failed to open card");
    assert_eq!(report.path, "MemoryCards/PS1/Beta/Beta-1.mcd");
    assert!(root.join("MemoryCards/PS1/Beta/Beta-1.mcd").exists());
}

#[test]
fn test_game_id_cannot_leave_card_root() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path().join("sd");
    fs::create_dir(&root).expect("Failed to create card root");
    let mut cards = CardManager::builder()
        .storage(FsStorage::new(&root))
        .settings(MemorySettings::new(Settings {
            game_id_tracking: true,
            ..Settings::default()
        }))
        .build()
        .expect("Failed to build manager");

    cards.set_game_id("../../../x");
    let report = cards.open().expect("Failed to open card");
    assert_eq!(report.path, "MemoryCards/PS1/.._.._.._x/.._.._.._x-1.mcd");
    assert!(root.join(&report.path).exists());
    assert!(!dir.path().join("x-1.mcd").exists());
    assert_eq!(
        fs::read_dir(dir.path()).expect("Failed to list temp dir").count(),
        1
    );
}

#[test]
fn test_settings_survive_restart() {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();
    let settings_file = root.join("settings.json");

    {
        let mut cards = CardManager::builder()
            .storage(FsStorage::new(root))
            .settings(JsonSettings::load(&settings_file).expect("Failed to load settings"))
            .build()
            .expect("Failed to build manager");
        cards.next_card();
        cards.next_channel();
        cards.open().expect("Failed to open card");
    }

    let cards = CardManager::builder()
        .storage(FsStorage::new(root))
        .settings(JsonSettings::load(&settings_file).expect("Failed to load settings"))
        .build()
        .expect("Failed to build manager");
    assert_eq!(cards.mode(), Mode::Normal);
    assert_eq!(cards.card_index(), 2);
    assert_eq!(cards.channel(), 2);
}

#[test]
fn test_change_notification_on_every_open() {
    let storage = MemoryStorage::new();
    let changes = ChangeCounter::new();
    let mut cards = CardManager::builder()
        .storage(storage)
        .notifier(changes.clone())
        .build()
        .expect("Failed to build manager");

    cards.open().expect("Failed to open card");
    cards.open().expect("Failed to reopen card");
    assert_eq!(changes.count(), 2);
}
