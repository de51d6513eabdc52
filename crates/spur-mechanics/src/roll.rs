//! The weekly investigation roll.
//!
//! A week's roll combines the investigator's own check, the help of any
//! active assistants, and a few random floors that keep a single bad week
//! from stalling an investigation. The result is stored on the
//! investigation so every later read in the same week sees the same value.

use rand::Rng;
use rand::rngs::StdRng;

use spur_core::{
    Character, GameSettings, InvestigationAssistant, InvestigationId, LoreResult, LoreStore,
};

use crate::dice::{CheckRequest, DiceCheck};
use crate::difficulty::{difficulty, newbie_bonus};

/// Difficulty relief for a player character who assists.
pub const PLAYER_ASSIST_MOD: i32 = 20;

/// Share of the completion value added to a successful roll.
const SUCCESS_BONUS_RATE: f64 = 0.12;

/// Rolls investigations against the configured settings and dice.
pub struct RollEngine<'a> {
    settings: &'a GameSettings,
    dice: &'a dyn DiceCheck,
}

impl<'a> RollEngine<'a> {
    /// Create an engine.
    pub fn new(settings: &'a GameSettings, dice: &'a dyn DiceCheck) -> Self {
        Self { settings, dice }
    }

    /// One assistant's contribution against `diff`.
    ///
    /// Player characters roll at an easier difficulty. Retainers get a bonus
    /// scaled by their assistant level but can never add more than ten per
    /// level. Nobody's help counts below zero.
    pub fn assistant_roll(
        &self,
        character: &Character,
        assistant: &InvestigationAssistant,
        diff: i32,
        rng: &mut StdRng,
    ) -> i32 {
        let player = character.is_player();
        let relief = if player { PLAYER_ASSIST_MOD } else { 0 };
        let request = CheckRequest::investigation(
            &assistant.stat_used,
            &assistant.skill_used,
            diff.saturating_sub(relief),
        );
        let mut roll = self.dice.check(character, &request, rng).max(0);
        if !player {
            let level = i32::try_from(character.assistant_level()).unwrap_or(i32::MAX);
            roll = roll.saturating_add(rng.random_range(0..=5) * level);
            roll = roll.min(level.saturating_mul(10));
        }
        roll
    }

    /// Roll the investigation for this week and store the result.
    ///
    /// `diff` replaces the computed difficulty when a GM supplies one.
    /// `modifier` is added on top either way.
    pub fn roll(
        &self,
        store: &mut LoreStore,
        id: InvestigationId,
        modifier: i32,
        diff: Option<i32>,
        rng: &mut StdRng,
    ) -> LoreResult<i32> {
        let inv = store.investigation(id)?;
        let diff = diff
            .unwrap_or_else(|| difficulty(store, self.settings, inv, rng))
            .saturating_add(modifier);

        let investigator = store.character(inv.character)?;
        let request = CheckRequest::investigation(&inv.stat_used, &inv.skill_used, diff);
        let mut roll = self.dice.check(investigator, &request, rng);

        let mut assistant_total = 0i32;
        let mut assistant_count = 0i32;
        for assistant in inv.active_assistants() {
            assistant_count += 1;
            let Some(helper) = store.get_character(assistant.character) else {
                continue;
            };
            assistant_total =
                assistant_total.saturating_add(self.assistant_roll(helper, assistant, diff, rng));
        }

        let baseline = rng.random_range(0..=100) + assistant_count;
        roll = roll.saturating_add(assistant_total.max(baseline));
        roll = roll.max(rng.random_range(-50..=200));
        if roll > 0 {
            let bonus = (f64::from(inv.completion_value) * SUCCESS_BONUS_RATE) as i32;
            roll = roll.saturating_add(bonus);
        }
        if let Some(rate) = self.settings.progress_rate() {
            roll = (f64::from(roll) * rate) as i32;
        }
        let newbie = newbie_bonus(store.investigations_started(inv.character));
        roll = (f64::from(roll) * (1.0 + f64::from(newbie) / 100.0)) as i32;

        tracing::debug!(
            investigation = %id,
            diff,
            assistants = assistant_count,
            assistant_total,
            roll,
            "rolled investigation"
        );
        store.investigation_mut(id)?.roll = roll;
        Ok(roll)
    }

    /// This week's roll, rolling first if nothing is stored yet.
    pub fn get_roll(
        &self,
        store: &mut LoreStore,
        id: InvestigationId,
        rng: &mut StdRng,
    ) -> LoreResult<i32> {
        let inv = store.investigation(id)?;
        if inv.roll_is_set() {
            return Ok(inv.roll);
        }
        self.roll(store, id, 0, None, rng)
    }
}
