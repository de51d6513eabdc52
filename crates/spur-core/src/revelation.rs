use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ClueId, RevelationId, SearchTagId};

/// A major piece of lore made up of clues.
///
/// A character learns a revelation once they know every clue marked
/// `required_for_revelation` and the summed rating of the tied clues they
/// know reaches `required_clue_value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revelation {
    /// Unique identifier.
    pub id: RevelationId,
    /// Display name.
    pub name: String,
    /// Text shown to characters who learn it.
    pub desc: String,
    /// Staff-only notes.
    pub gm_notes: String,
    /// Summed clue rating needed to unlock.
    pub required_clue_value: u32,
    /// Whether the revelation is fictitious.
    pub red_herring: bool,
    /// Grouping label for related revelations.
    pub mystery: Option<String>,
    /// Tags used for matching.
    pub search_tags: BTreeSet<SearchTagId>,
}

impl Revelation {
    /// Create a revelation with the given unlock threshold.
    pub fn new(name: impl Into<String>, required_clue_value: u32) -> Self {
        Self {
            id: RevelationId::new(),
            name: name.into(),
            desc: String::new(),
            gm_notes: String::new(),
            required_clue_value,
            red_herring: false,
            mystery: None,
            search_tags: BTreeSet::new(),
        }
    }

    /// Set the description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Set the mystery this revelation belongs to.
    pub fn in_mystery(mut self, mystery: impl Into<String>) -> Self {
        self.mystery = Some(mystery.into());
        self
    }

    /// "required of available" summary, e.g. `60 of 75`.
    pub fn requires(&self, total_clue_value: u32) -> String {
        format!("{} of {}", self.required_clue_value, total_clue_value)
    }
}

impl fmt::Display for Revelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Ties a clue to a revelation it contributes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueForRevelation {
    /// The contributing clue.
    pub clue: ClueId,
    /// The revelation it feeds.
    pub revelation: RevelationId,
    /// Whether the clue must be known before the revelation unlocks.
    pub required_for_revelation: bool,
    /// Ordering hint; lower tiers are meant to be found first.
    pub tier: u32,
}

impl ClueForRevelation {
    /// A required, tier-0 usage.
    pub fn new(clue: ClueId, revelation: RevelationId) -> Self {
        Self {
            clue,
            revelation,
            required_for_revelation: true,
            tier: 0,
        }
    }

    /// Mark the clue as optional: it counts toward the value but is not mandatory.
    pub fn optional(mut self) -> Self {
        self.required_for_revelation = false;
        self
    }

    /// Set the tier.
    pub fn at_tier(mut self, tier: u32) -> Self {
        self.tier = tier;
        self
    }
}
