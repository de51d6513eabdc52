use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, ClueId, SearchTagId};

/// Name prefix marking a clue that was auto-created for staff to write.
pub const PLACEHOLDER_PREFIX: &str = "PLACEHOLDER";

/// What kind of fact a clue represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClueType {
    /// General knowledge about the game world.
    #[default]
    GameLore,
    /// A prophetic or magical vision.
    Vision,
    /// A secret about a specific character or object.
    CharacterSecret,
}

impl fmt::Display for ClueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameLore => write!(f, "Game Lore"),
            Self::Vision => write!(f, "Vision"),
            Self::CharacterSecret => write!(f, "Character Secret"),
        }
    }
}

/// An atomic discoverable fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clue {
    /// Unique identifier.
    pub id: ClueId,
    /// Display name.
    pub name: String,
    /// The kind of fact.
    pub clue_type: ClueType,
    /// Difficulty and weight toward revelations.
    pub rating: u32,
    /// Text shown to characters who know the clue.
    pub desc: String,
    /// Staff-only notes.
    pub gm_notes: String,
    /// Whether investigations may target this clue.
    pub allow_investigation: bool,
    /// Whether characters may share this clue.
    pub allow_sharing: bool,
    /// Whether the clue is fictitious.
    pub red_herring: bool,
    /// Tags used for matching investigations.
    pub search_tags: BTreeSet<SearchTagId>,
    /// The in-game object a character secret is about.
    pub tangible_object: Option<String>,
    /// The character who wrote the clue, if any.
    pub author: Option<CharacterId>,
    /// When the clue was created.
    pub created_at: DateTime<Utc>,
}

impl Clue {
    /// Create a game-lore clue with the given name and rating.
    ///
    /// New clues can be shared but are not investigable until staff say so.
    pub fn new(name: impl Into<String>, rating: u32) -> Self {
        Self {
            id: ClueId::new(),
            name: name.into(),
            clue_type: ClueType::GameLore,
            rating,
            desc: String::new(),
            gm_notes: String::new(),
            allow_investigation: false,
            allow_sharing: true,
            red_herring: false,
            search_tags: BTreeSet::new(),
            tangible_object: None,
            author: None,
            created_at: Utc::now(),
        }
    }

    /// Set the description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Set the clue type.
    pub fn with_type(mut self, clue_type: ClueType) -> Self {
        self.clue_type = clue_type;
        self
    }

    /// Allow or forbid investigations targeting this clue.
    pub fn investigable(mut self, allow: bool) -> Self {
        self.allow_investigation = allow;
        self
    }

    /// Allow or forbid sharing.
    pub fn shareable(mut self, allow: bool) -> Self {
        self.allow_sharing = allow;
        self
    }

    /// Add a search tag.
    pub fn with_tag(mut self, tag: SearchTagId) -> Self {
        self.search_tags.insert(tag);
        self
    }

    /// Whether this clue is a stub waiting for staff to write it.
    pub fn is_placeholder(&self) -> bool {
        self.name.starts_with(PLACEHOLDER_PREFIX)
    }

    /// Whether the two clues share at least one tag.
    pub fn shares_tags_with(&self, other: &Clue) -> bool {
        !self.search_tags.is_disjoint(&other.search_tags)
    }

    /// Number of tags this clue has in common with `tags`.
    pub fn tag_overlap(&self, tags: &BTreeSet<SearchTagId>) -> usize {
        self.search_tags.intersection(tags).count()
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
