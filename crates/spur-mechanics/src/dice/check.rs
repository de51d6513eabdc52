//! The dice-check primitive that investigations roll against.

use std::collections::HashMap;

use rand::rngs::StdRng;

use spur_core::investigation::DEFAULT_SKILL;
use spur_core::{Character, CharacterId};

use super::{DicePool, Die};

/// Stat rolled when an investigation names none.
pub const FALLBACK_STAT: &str = "wits";

/// Keep dice every check starts with.
const DEFAULT_KEEP: u32 = 2;

/// What to roll for a check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckRequest {
    /// Stats summed into the pool.
    pub stats: Vec<String>,
    /// Skills added to the pool.
    pub skills: Vec<String>,
    /// Subtracted from the kept dice.
    pub difficulty: i32,
    /// Average the skills instead of summing them.
    pub average_skills: bool,
}

impl CheckRequest {
    /// The check an investigator or assistant makes.
    ///
    /// The chosen stat joins perception and intellect. The chosen skill is
    /// averaged with investigation, which is always part of the roll.
    pub fn investigation(stat: &str, skill: &str, difficulty: i32) -> Self {
        let stat = non_empty_or(stat, FALLBACK_STAT);
        let skill = non_empty_or(skill, DEFAULT_SKILL);
        Self {
            stats: dedup([stat, "perception".to_string(), "intellect".to_string()]),
            skills: dedup([skill, DEFAULT_SKILL.to_string()]),
            difficulty,
            average_skills: true,
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn dedup<const N: usize>(names: [String; N]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(N);
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Rolls a character's stats and skills against a difficulty.
///
/// Higher is better. A negative result means the character fell short.
pub trait DiceCheck {
    /// Roll the check.
    fn check(&self, character: &Character, request: &CheckRequest, rng: &mut StdRng) -> i32;
}

/// The standard check: a pool of exploding d10s, keeping the highest.
///
/// The pool holds one die per point of stat and skill. A single-stat check
/// keeps `1 + stat/2 + skill` dice, a multi-stat check keeps `2 + skill`.
/// The kept dice are summed and the difficulty subtracted.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepHighestCheck;

impl DiceCheck for KeepHighestCheck {
    fn check(&self, character: &Character, request: &CheckRequest, rng: &mut StdRng) -> i32 {
        let stat_value: u32 = request.stats.iter().map(|s| character.stat(s)).sum();
        let mut skill_value: u32 = request.skills.iter().map(|s| character.skill(s)).sum();
        if request.average_skills && !request.skills.is_empty() {
            skill_value /= request.skills.len() as u32;
        }

        let mut keep = DEFAULT_KEEP;
        if request.stats.len() == 1 && stat_value > 0 {
            keep = 1 + stat_value / 2;
        }
        keep += skill_value;

        let roll = DicePool::new()
            .add(Die::D10, stat_value + skill_value)
            .exploding()
            .roll(rng);
        let kept = i32::try_from(roll.keep_highest(keep as usize)).unwrap_or(i32::MAX);
        kept.saturating_sub(request.difficulty)
    }
}

/// A check with predetermined results, for staff rulings and tests.
#[derive(Debug, Clone, Default)]
pub struct FixedCheck {
    default: i32,
    overrides: HashMap<CharacterId, i32>,
}

impl FixedCheck {
    /// Every check returns `value`.
    pub fn new(value: i32) -> Self {
        Self {
            default: value,
            overrides: HashMap::new(),
        }
    }

    /// Checks by `character` return `value` instead of the default.
    pub fn with(mut self, character: CharacterId, value: i32) -> Self {
        self.overrides.insert(character, value);
        self
    }
}

impl DiceCheck for FixedCheck {
    fn check(&self, character: &Character, _request: &CheckRequest, _rng: &mut StdRng) -> i32 {
        self.overrides
            .get(&character.id)
            .copied()
            .unwrap_or(self.default)
    }
}
