use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, ClueId, InvestigationId, RevelationId};

/// How a character came to know a clue or revelation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMethod {
    /// Found through a successful investigation.
    Investigation,
    /// Shared by another character.
    Sharing,
    /// Granted directly by staff.
    StaffGrant,
    /// Awarded on a resync of revelations the character should have had.
    CheckedForMissing,
    /// Anything else, described in free text.
    Other(String),
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Investigation => write!(f, "investigation"),
            Self::Sharing => write!(f, "Sharing"),
            Self::StaffGrant => write!(f, "Staff Grant"),
            Self::CheckedForMissing => write!(f, "Checked for Missing"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// The record that a character knows a clue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClueDiscovery {
    /// The known clue.
    pub clue: ClueId,
    /// The character who knows it.
    pub character: CharacterId,
    /// How it was learned.
    pub discovery_method: DiscoveryMethod,
    /// Free-text note about how it was learned.
    pub message: String,
    /// When it was learned.
    pub date: DateTime<Utc>,
    /// The investigation that found it, if any.
    pub investigation: Option<InvestigationId>,
    /// The character who shared it, if any.
    pub revealed_by: Option<CharacterId>,
    /// The character's own notes.
    pub notes: String,
}

impl ClueDiscovery {
    /// A fresh discovery dated now.
    pub fn new(clue: ClueId, character: CharacterId, method: DiscoveryMethod) -> Self {
        Self {
            clue,
            character,
            discovery_method: method,
            message: String::new(),
            date: Utc::now(),
            investigation: None,
            revealed_by: None,
            notes: String::new(),
        }
    }
}

/// The record that a character knows a revelation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevelationDiscovery {
    /// The known revelation.
    pub revelation: RevelationId,
    /// The character who knows it.
    pub character: CharacterId,
    /// How it was learned.
    pub discovery_method: DiscoveryMethod,
    /// Free-text note about how it was learned.
    pub message: String,
    /// When it was learned.
    pub date: DateTime<Utc>,
    /// The investigation that led to it, if any.
    pub investigation: Option<InvestigationId>,
    /// The character who revealed it, if any.
    pub revealed_by: Option<CharacterId>,
}

impl RevelationDiscovery {
    /// A fresh revelation discovery dated now.
    pub fn new(revelation: RevelationId, character: CharacterId, method: DiscoveryMethod) -> Self {
        Self {
            revelation,
            character,
            discovery_method: method,
            message: String::new(),
            date: Utc::now(),
            investigation: None,
            revealed_by: None,
        }
    }
}
