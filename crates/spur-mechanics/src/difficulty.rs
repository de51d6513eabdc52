//! Investigation difficulty.

use rand::rngs::StdRng;

use spur_core::{GameSettings, Investigation, LoreStore};

use crate::discount::resource_mod;

/// Difficulty of an investigation with no automated target.
pub const BASE_DIFFICULTY: i32 = 30;

/// Bonus for a character's first few investigations.
///
/// Starts at 60 and falls by 10 for every investigation the character has
/// ever started, reaching 0 at the sixth.
pub fn newbie_bonus(investigations_started: usize) -> i32 {
    let started = i32::try_from(investigations_started).unwrap_or(i32::MAX);
    60i32.saturating_sub(started.saturating_mul(10)).max(0)
}

/// The starting difficulty before modifiers.
///
/// GM-run investigations and investigations without a target use
/// [`BASE_DIFFICULTY`]. Otherwise the target clue's rating is the base.
pub fn base_difficulty(store: &LoreStore, investigation: &Investigation) -> i32 {
    if !investigation.automate_result {
        return BASE_DIFFICULTY;
    }
    investigation
        .clue_target
        .and_then(|id| store.get_clue(id))
        .map_or(BASE_DIFFICULTY, |clue| {
            i32::try_from(clue.rating).unwrap_or(i32::MAX)
        })
}

/// Full difficulty: base, plus the server modifier, minus the newbie bonus
/// and the resource discount.
///
/// A malformed difficulty modifier skips the modifier and newbie steps, but
/// the resource discount always applies.
pub fn difficulty(
    store: &LoreStore,
    settings: &GameSettings,
    investigation: &Investigation,
    rng: &mut StdRng,
) -> i32 {
    let mut value = base_difficulty(store, investigation);
    if let Some(modifier) = settings.difficulty_mod() {
        let modifier = i32::try_from(modifier).unwrap_or(0);
        value = value
            .saturating_add(modifier)
            .saturating_sub(newbie_bonus(store.investigations_started(investigation.character)));
    }
    value.saturating_sub(resource_mod(&investigation.committed(), rng))
}
