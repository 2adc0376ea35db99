/// Property tests for card navigation

use cardman::*;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Nav {
    NextCard,
    PrevCard,
    NextChannel,
    PrevChannel,
}

fn nav_strategy() -> impl Strategy<Value = Nav> {
    prop_oneof![
        Just(Nav::NextCard),
        Just(Nav::PrevCard),
        Just(Nav::NextChannel),
        Just(Nav::PrevChannel),
    ]
}

#[derive(Debug, Clone)]
struct Setup {
    settings: Settings,
    game: Option<String>,
    named: Vec<String>,
    channels: u8,
    boot_channels: u8,
}

fn setup_strategy() -> impl Strategy<Value = Setup> {
    (
        any::<bool>(),
        any::<bool>(),
        1u8..=8,
        1u16..=u16::MAX,
        1u8..=8,
        proptest::option::of("[A-Z]{4}-[0-9]{5}"),
        proptest::collection::vec("[A-Za-z]{1,12}", 0..4),
        1u8..=8,
        1u8..=8,
    )
        .prop_map(
            |(autoboot, tracking, boot_channel, card_index, card_channel, game, named, channels, boot_channels)| Setup {
                settings: Settings {
                    autoboot,
                    game_id_tracking: tracking,
                    boot_channel,
                    card_index,
                    card_channel,
                },
                game,
                named,
                channels,
                boot_channels,
            },
        )
}

/// Directory where every card shares one channel count except the boot card
struct UniformDirectory {
    named: Vec<String>,
    channels: u8,
    boot_channels: u8,
}

impl CardDirectory for UniformDirectory {
    fn card_folder(&self, _game_id: &str) -> Option<String> {
        None
    }

    fn named_folder(&self, _root: &str, n: usize) -> Option<String> {
        self.named.get(n).cloned()
    }

    fn max_channels(&self, _folder: &str, card_name: &str) -> u8 {
        if card_name == "BootCard" {
            self.boot_channels
        } else {
            self.channels
        }
    }
}

fn build(setup: &Setup) -> CardManager {
    let game = StaticGame::new();
    if let Some(id) = &setup.game {
        game.insert(id);
    }

    CardManager::builder()
        .storage(MemoryStorage::new())
        .settings(MemorySettings::new(setup.settings.clone()))
        .directory(UniformDirectory {
            named: setup.named.clone(),
            channels: setup.channels,
            boot_channels: setup.boot_channels,
        })
        .game(game)
        .build()
        .expect("Failed to build manager")
}

fn assert_valid(cards: &CardManager) {
    let channel = cards.channel();
    assert!(channel >= 1 && channel <= cards.max_channels());

    match cards.selection().card() {
        CardMode::Normal { index } => {
            assert_ne!(index, CARD_IDX_SPECIAL);
            assert_eq!(cards.card_index(), index);
            assert_eq!(cards.folder_name(), format!("Card{}", index));
        }
        CardMode::Boot => {
            assert_eq!(cards.card_index(), CARD_IDX_SPECIAL);
            assert_eq!(cards.folder_name(), "BOOT");
        }
        CardMode::Named { cursor } => {
            assert_eq!(cards.card_index(), CARD_IDX_SPECIAL);
            assert!(cursor >= 1);
        }
        CardMode::GameId => {
            assert_eq!(cards.card_index(), CARD_IDX_SPECIAL);
            assert!(!cards.folder_name().is_empty());
        }
    }
}

proptest! {
    #[test]
    fn navigation_always_lands_on_valid_selection(
        setup in setup_strategy(),
        moves in proptest::collection::vec(nav_strategy(), 0..64),
    ) {
        let mut cards = build(&setup);
        assert_valid(&cards);

        for nav in moves {
            match nav {
                Nav::NextCard => cards.next_card(),
                Nav::PrevCard => cards.prev_card(),
                Nav::NextChannel => cards.next_channel(),
                Nav::PrevChannel => cards.prev_channel(),
            }
            assert_valid(&cards);
            prop_assert!(cards.needs_update());
        }
    }

    #[test]
    fn next_then_prev_returns_to_numbered_card(
        index in 1u16..u16::MAX,
        channel in 1u8..=8,
    ) {
        let setup = Setup {
            settings: Settings { card_index: index, card_channel: channel, ..Settings::default() },
            game: None,
            named: Vec::new(),
            channels: 8,
            boot_channels: 8,
        };
        let mut cards = build(&setup);
        prop_assert_eq!(cards.channel(), channel);

        cards.next_card();
        cards.prev_card();
        prop_assert_eq!(cards.mode(), Mode::Normal);
        prop_assert_eq!(cards.card_index(), index);
        prop_assert_eq!(cards.channel(), 1);
    }

    #[test]
    fn card_index_never_exceeds_u16(start in (u16::MAX - 16)..=u16::MAX, steps in 0usize..48) {
        let setup = Setup {
            settings: Settings { card_index: start, ..Settings::default() },
            game: None,
            named: Vec::new(),
            channels: 8,
            boot_channels: 8,
        };
        let mut cards = build(&setup);
        for _ in 0..steps {
            cards.next_card();
        }
        prop_assert_eq!(cards.mode(), Mode::Normal);
        prop_assert_eq!(cards.card_index(), start.saturating_add(steps as u16));
    }

    #[test]
    fn prev_below_first_card_never_leaves_sentinel_normal(setup in setup_strategy()) {
        let mut setup = setup;
        setup.settings.card_index = 1;
        let mut cards = build(&setup);
        cards.switch_to_default();
        prop_assert_eq!(cards.card_index(), 1);

        cards.prev_card();
        assert_valid(&cards);
        if cards.mode() == Mode::Normal {
            prop_assert_eq!(cards.card_index(), 1);
        }
    }
}
