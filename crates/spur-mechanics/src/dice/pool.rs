//! Dice pool construction and rolling.

use rand::Rng;
use rand::rngs::StdRng;

use super::Die;

/// A collection of dice rolled together.
#[derive(Debug, Clone, Default)]
pub struct DicePool {
    /// The dice in this pool.
    pub dice: Vec<Die>,
    /// Whether a die showing its maximum is rolled again and added.
    pub exploding: bool,
}

impl DicePool {
    /// Create an empty dice pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` dice of the given type.
    pub fn add(mut self, die: Die, count: u32) -> Self {
        for _ in 0..count {
            self.dice.push(die);
        }
        self
    }

    /// Make maximum results explode.
    pub fn exploding(mut self) -> Self {
        self.exploding = true;
        self
    }

    /// Returns how many dice are in the pool.
    pub fn count(&self) -> usize {
        self.dice.len()
    }

    /// Returns true if the pool has no dice.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Roll all dice in the pool using the given RNG.
    pub fn roll(&self, rng: &mut StdRng) -> RollResult {
        let values = self
            .dice
            .iter()
            .map(|die| self.roll_one(*die, rng))
            .collect();
        RollResult { values }
    }

    fn roll_one(&self, die: Die, rng: &mut StdRng) -> u32 {
        let sides = die.sides();
        let mut total = 0;
        loop {
            let value = rng.random_range(1..=sides);
            total += value;
            if !self.exploding || sides < 2 || value < sides {
                return total;
            }
        }
    }
}

/// The result of rolling a dice pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollResult {
    /// Per-die totals, including explosions.
    pub values: Vec<u32>,
}

impl RollResult {
    /// Sum of all die values.
    pub fn total(&self) -> u32 {
        self.values.iter().sum()
    }

    /// The highest single die value, or 0 if empty.
    pub fn highest(&self) -> u32 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    /// Sum of the `keep` highest dice.
    pub fn keep_highest(&self, keep: usize) -> u32 {
        let mut sorted = self.values.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.into_iter().take(keep).sum()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}] = {}", values.join(", "), self.total())
    }
}
