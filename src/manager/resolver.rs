/// Mode entry points and card/channel navigation
///
/// Every navigation lands on a valid selection: entering Normal mode cannot
/// fail, so each fallback chain ends there.

use super::CardManager;
use crate::format::constants::{CARD_IDX_SPECIAL, CHAN_MIN, PS1_CARDS_DIR};
use crate::format::path::FolderName;
use crate::selection::{CardMode, Mode, Selection};

impl CardManager {
    /// Select the startup card: tracked game, else boot card, else the last
    /// numbered card
    pub fn init(&mut self) {
        if !self.try_enter_game_id() && !self.try_enter_boot() {
            self.enter_default();
        }
        self.clamp_channel();
        tracing::debug!("Initial card: {}", self.selection);
    }

    /// Move to the next card
    ///
    /// From a named card this steps *back* through the named listing before
    /// falling through to the boot, game id and numbered cards.
    pub fn next_card(&mut self) {
        match self.selection.card() {
            CardMode::Named { .. } => {
                if !self.try_enter_prev_named()
                    && !self.try_enter_boot()
                    && !self.try_enter_game_id()
                {
                    self.enter_default();
                }
            }
            CardMode::Boot => {
                if !self.try_enter_game_id() {
                    self.enter_default();
                }
            }
            CardMode::GameId => self.enter_default(),
            CardMode::Normal { index } => {
                self.selection = Selection::normal(index.saturating_add(1), CHAN_MIN);
            }
        }

        self.finish_navigation();
    }

    /// Move to the previous card
    pub fn prev_card(&mut self) {
        match self.selection.card() {
            CardMode::Named { .. } | CardMode::Boot => {
                if !self.try_enter_next_named() {
                    self.enter_default();
                }
            }
            CardMode::GameId => {
                if !self.try_enter_boot() && !self.try_enter_next_named() {
                    self.enter_default();
                }
            }
            CardMode::Normal { index } => {
                let index = index.saturating_sub(1);
                if index <= CARD_IDX_SPECIAL {
                    if !self.try_enter_game_id()
                        && !self.try_enter_boot()
                        && !self.try_enter_next_named()
                    {
                        self.enter_default();
                    }
                } else {
                    self.selection = Selection::normal(index, CHAN_MIN);
                }
            }
        }

        self.finish_navigation();
    }

    /// Move to the next channel, wrapping to the first
    pub fn next_channel(&mut self) {
        let max = self.max_channels();
        let channel = self.selection.channel();
        let next = if channel >= max { CHAN_MIN } else { channel + 1 };
        self.selection.set_channel(next);
        self.needs_update = true;
    }

    /// Move to the previous channel, wrapping to the last
    pub fn prev_channel(&mut self) {
        let max = self.max_channels();
        let channel = self.selection.channel();
        let prev = if channel <= CHAN_MIN {
            max
        } else {
            (channel - 1).min(max)
        };
        self.selection.set_channel(prev);
        self.needs_update = true;
    }

    /// Follow a newly detected game id
    ///
    /// Ignored when game id tracking is off or `id` is empty. Switching only
    /// happens if the resulting card differs from the current one.
    pub fn set_game_id(&mut self, id: &str) {
        if !self.settings.game_id_tracking() || id.is_empty() {
            return;
        }

        let folder = self.game_folder(id);
        if self.selection.mode() != Mode::GameId || *self.selection.folder_name() != folder {
            tracing::debug!("Game id {} selects card folder {}", id, folder);
            self.selection = Selection::game_id(folder);
            self.needs_update = true;
        }
    }

    /// Switch to the boot card if autoboot is enabled
    pub fn switch_to_boot(&mut self) {
        if self.try_enter_boot() {
            self.clamp_channel();
            self.needs_update = true;
        }
    }

    /// Return to the last numbered card from a boot, named or game id card
    pub fn switch_to_default(&mut self) {
        if self.selection.card_index() == CARD_IDX_SPECIAL {
            self.enter_default();
            self.clamp_channel();
            self.needs_update = true;
        }
    }

    /// Channel count of the selected card
    pub fn max_channels(&self) -> u8 {
        self.directory
            .max_channels(
                self.selection.folder_name().as_str(),
                self.selection.card_name(),
            )
            .max(CHAN_MIN)
    }

    fn finish_navigation(&mut self) {
        self.clamp_channel();
        self.needs_update = true;
        tracing::debug!("Selected {}", self.selection);
    }

    fn clamp_channel(&mut self) {
        let max = self.max_channels();
        let channel = self.selection.channel().clamp(CHAN_MIN, max);
        self.selection.set_channel(channel);
    }

    fn game_folder(&self, id: &str) -> FolderName {
        let folder = self.directory.card_folder(id).unwrap_or_default();
        if folder.is_empty() {
            FolderName::new(id)
        } else {
            FolderName::new(&folder)
        }
    }

    fn try_enter_boot(&mut self) -> bool {
        if !self.settings.autoboot() {
            return false;
        }

        self.selection = Selection::boot(self.settings.boot_channel());
        true
    }

    fn try_enter_game_id(&mut self) -> bool {
        if !self.settings.game_id_tracking() {
            return false;
        }

        let parent_id = match self.game.current_parent_id() {
            Some(id) if !id.is_empty() => id,
            _ => return false,
        };

        self.selection = Selection::game_id(self.game_folder(&parent_id));
        true
    }

    fn try_enter_next_named(&mut self) -> bool {
        let lookup = self.selection.named_cursor().unwrap_or(0);

        match self.named_folder(lookup) {
            Some(folder) => {
                self.selection = Selection::named(lookup + 1, folder);
                true
            }
            None => false,
        }
    }

    fn try_enter_prev_named(&mut self) -> bool {
        let cursor = match self.selection.named_cursor() {
            Some(cursor) if cursor > 1 => cursor,
            _ => return false,
        };

        match self.named_folder(cursor - 2) {
            Some(folder) => {
                self.selection = Selection::named(cursor - 1, folder);
                true
            }
            None => false,
        }
    }

    fn enter_default(&mut self) {
        self.selection = Selection::normal(
            self.settings.card_index(),
            self.settings.card_channel(),
        );
    }

    fn named_folder(&self, n: usize) -> Option<FolderName> {
        self.directory
            .named_folder(PS1_CARDS_DIR, n)
            .filter(|name| !name.is_empty())
            .map(|name| FolderName::new(&name))
    }
}
