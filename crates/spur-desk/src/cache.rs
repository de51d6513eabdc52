//! Per-character investigation costs, cached until the sheet changes.
//!
//! The costs only depend on a character's stats and skills, so they are
//! computed once and kept until something calls [`CostCache::invalidate`]
//! for that character (or [`CostCache::invalidate_all`] after a rules
//! change).

use std::collections::HashMap;

use spur_core::investigation::DEFAULT_SKILL;
use spur_core::{Character, CharacterId};
use spur_mechanics::sheet::{SOCIAL_SKILLS, SOCIAL_STATS};

/// Action points to mark an investigation active, before skill relief.
pub const BASE_ACTIVE_COST: u32 = 50;
/// Social resources to start an investigation, before skill relief.
pub const BASE_START_COST: u32 = 25;
/// Relief per point of investigation skill on both costs above.
pub const SKILL_RELIEF: u32 = 5;

/// The costs of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Costs {
    /// AP to mark an investigation active or to assist one.
    pub active_ap: u32,
    /// Social resources to start a new investigation.
    pub start_social: u32,
    /// AP per clue per recipient when sharing.
    pub share_ap: u32,
}

impl Costs {
    /// Compute from a character sheet.
    pub fn for_character(character: &Character) -> Self {
        let skill = character.skill(DEFAULT_SKILL);
        let relief = skill.saturating_mul(SKILL_RELIEF);
        Self {
            active_ap: BASE_ACTIVE_COST.saturating_sub(relief),
            start_social: BASE_START_COST.saturating_sub(relief),
            share_ap: share_cost(character),
        }
    }
}

/// `trunc(100 / (seed + 1)) + 1`, where the seed sums the social stats, the
/// social skills, and three times investigation.
fn share_cost(character: &Character) -> u32 {
    let stats: u32 = SOCIAL_STATS.iter().map(|s| character.stat(s)).sum();
    let skills: u32 = SOCIAL_SKILLS.iter().map(|s| character.skill(s)).sum();
    let seed = stats
        .saturating_add(skills)
        .saturating_add(character.skill(DEFAULT_SKILL).saturating_mul(3));
    100 / seed.saturating_add(1) + 1
}

/// Cached [`Costs`] keyed by character.
#[derive(Debug, Clone, Default)]
pub struct CostCache {
    costs: HashMap<CharacterId, Costs>,
}

impl CostCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The character's costs, computed on first use.
    pub fn get(&mut self, character: &Character) -> Costs {
        *self
            .costs
            .entry(character.id)
            .or_insert_with(|| Costs::for_character(character))
    }

    /// Whether the character's costs are cached.
    pub fn contains(&self, character: CharacterId) -> bool {
        self.costs.contains_key(&character)
    }

    /// Forget one character's costs.
    pub fn invalidate(&mut self, character: CharacterId) {
        self.costs.remove(&character);
    }

    /// Forget everything.
    pub fn invalidate_all(&mut self) {
        self.costs.clear();
    }
}
