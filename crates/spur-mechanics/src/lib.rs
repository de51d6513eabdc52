//! Investigation mechanics for Spurensuche.
//!
//! Provides the dice-check primitive, the resource discount, difficulty and
//! completion-value calculators, the weekly roll engine, a weighted picker
//! for choosing clues, and the stat and skill names a character sheet uses.

pub mod completion;
pub mod dice;
pub mod difficulty;
pub mod discount;
pub mod picker;
pub mod roll;
pub mod sheet;

pub use completion::{completion_value, completion_value_for};
pub use dice::{CheckRequest, DiceCheck, DicePool, Die, FixedCheck, KeepHighestCheck, RollResult};
pub use difficulty::{difficulty, newbie_bonus};
pub use discount::resource_mod;
pub use picker::WeightedPicker;
pub use roll::RollEngine;
pub use sheet::{is_valid_skill, is_valid_stat};
