//! Dice types, pools, and the dice-check primitive.
//!
//! Investigations only need ten-siders for the default check, but the pool
//! accepts any polyhedral die so staff tooling can roll freeform expressions.

pub mod check;
pub mod pool;

pub use check::{CheckRequest, DiceCheck, FixedCheck, KeepHighestCheck};
pub use pool::{DicePool, RollResult};

use serde::{Deserialize, Serialize};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Six-sided die.
    D6,
    /// Ten-sided die.
    D10,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D6 => 6,
            Self::D10 => 10,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n.max(1),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}
