use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::SearchTagId;

/// A keyword used to match clues and revelations against investigations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTag {
    /// Unique identifier.
    pub id: SearchTagId,
    /// Unique name, compared case-insensitively.
    pub name: String,
}

impl SearchTag {
    /// Create a new tag with a fresh ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SearchTagId::new(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SearchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
