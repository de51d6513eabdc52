//! Weighted random selection over `(item, weight)` pairs.

use rand::Rng;
use rand::rngs::StdRng;

/// Picks one option with probability proportional to its weight.
///
/// Zero-weight options are only chosen when every option weighs zero, in
/// which case the pick is uniform.
#[derive(Debug, Clone)]
pub struct WeightedPicker<T> {
    options: Vec<(T, u32)>,
}

impl<T> Default for WeightedPicker<T> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
        }
    }
}

impl<T> WeightedPicker<T> {
    /// Create an empty picker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option.
    pub fn add(&mut self, item: T, weight: u32) {
        self.options.push((item, weight));
    }

    /// Builder form of [`WeightedPicker::add`].
    pub fn with(mut self, item: T, weight: u32) -> Self {
        self.add(item, weight);
        self
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether there is nothing to pick.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.options.iter().map(|(_, w)| u64::from(*w)).sum()
    }

    /// Pick an option, or `None` if the picker is empty.
    pub fn pick(&self, rng: &mut StdRng) -> Option<&T> {
        let index = self.pick_index(rng)?;
        self.options.get(index).map(|(item, _)| item)
    }

    /// Consume the picker and return the picked option.
    pub fn into_pick(mut self, rng: &mut StdRng) -> Option<T> {
        let index = self.pick_index(rng)?;
        Some(self.options.swap_remove(index).0)
    }

    fn pick_index(&self, rng: &mut StdRng) -> Option<usize> {
        match self.options.len() {
            0 => None,
            1 => Some(0),
            len => {
                let total = self.total_weight();
                if total == 0 {
                    return Some(rng.random_range(0..len));
                }
                let mut target = rng.random_range(0..total);
                for (index, (_, weight)) in self.options.iter().enumerate() {
                    let weight = u64::from(*weight);
                    if target < weight {
                        return Some(index);
                    }
                    target -= weight;
                }
                None
            }
        }
    }
}

impl<T> FromIterator<(T, u32)> for WeightedPicker<T> {
    fn from_iter<I: IntoIterator<Item = (T, u32)>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}
