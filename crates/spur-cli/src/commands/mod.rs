pub mod clues;
pub mod exec;
pub mod inbox;
pub mod init;
pub mod show;
pub mod week;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spur_core::{CharacterId, GameSettings, LoreStore};
use spur_desk::{Desk, DeskConfig, Inbox};

/// Everything a game keeps between runs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoreFile {
    #[serde(default)]
    pub settings: GameSettings,
    pub store: LoreStore,
    #[serde(default)]
    pub inbox: Inbox,
    #[serde(default)]
    pub week: u32,
}

impl LoreFile {
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        serde_json::from_str(&text).map_err(|e| format!("invalid lore file {}: {e}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| format!("cannot serialize lore: {e}"))?;
        fs::write(path, text).map_err(|e| format!("cannot write {}: {e}", path.display()))
    }

    /// Look up a character by name.
    pub fn character(&self, name: &str) -> Result<CharacterId, String> {
        self.store
            .find_character(name)
            .map(|c| c.id)
            .ok_or_else(|| format!("no character named \"{name}\""))
    }

    /// Open a desk on this file. The seed is offset by the week so each week
    /// rolls differently.
    pub fn into_desk(self, seed: u64) -> Desk {
        let config = DeskConfig::default().with_seed(seed.wrapping_add(u64::from(self.week)));
        Desk::with_notifier(self.store, self.settings, config, self.inbox).with_week(self.week)
    }

    pub fn from_desk(desk: Desk) -> Self {
        let week = desk.week();
        let (store, settings, inbox) = desk.into_parts();
        Self {
            settings,
            store,
            inbox,
            week,
        }
    }
}
