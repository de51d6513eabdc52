//! How much progress an investigation needs before it finds its clue.
//!
//! Rarely found clues take longer to uncover than common ones. The
//! multiplier compares the average discovery count of investigable clues to
//! the clue's own count, smoothed by a half so an undiscovered clue doesn't
//! divide by zero.

use spur_core::{ClueId, LoreResult, LoreStore};

/// Smoothing added to a clue's own discovery count.
const DISCOVERY_SMOOTHING: f64 = 0.5;

/// Multiplier applied to a clue's rating.
pub fn discovery_multiplier(average_discoveries: f64, own_discoveries: usize) -> f64 {
    average_discoveries / (own_discoveries as f64 + DISCOVERY_SMOOTHING)
}

/// `max(1, round(rating * multiplier))`, halves rounding away from zero.
pub fn completion_value(rating: u32, average_discoveries: f64, own_discoveries: usize) -> i32 {
    let value = f64::from(rating) * discovery_multiplier(average_discoveries, own_discoveries);
    // `as` saturates, which is what we want for absurd ratings.
    (value.round() as i32).max(1)
}

/// Completion value of a clue given the store's current discovery counts.
pub fn completion_value_for(store: &LoreStore, clue: ClueId) -> LoreResult<i32> {
    let rating = store.clue(clue)?.rating;
    Ok(completion_value(
        rating,
        store.average_investigable_discoveries(),
        store.discovery_count(clue),
    ))
}
