//! Core types for Spurensuche: the lore model behind clue investigations.
//!
//! This crate defines search tags, clues, revelations, the discovery records
//! that tie them to characters, and the weekly investigation records. All of
//! it lives in a [`LoreStore`], which enforces the uniqueness rules the rest
//! of the workspace relies on.

/// Character records: stats, skills, and spendable resources.
pub mod character;
/// Clues and clue types.
pub mod clue;
/// Clue and revelation discovery records.
pub mod discovery;
/// Error types used throughout the crate.
pub mod error;
/// Identifiers for every kind of lore record.
pub mod ids;
/// Investigation and assistant records.
pub mod investigation;
/// Query builder for filtering clues.
pub mod query;
/// Revelations and their clue usage.
pub mod revelation;
/// Server-wide tunable settings.
pub mod settings;
/// The store that owns all lore records.
pub mod store;
/// Search tags linking clues and revelations.
pub mod tag;

/// Re-export character types.
pub use character::{Character, CharacterKind, Cost, ResourceKind};
/// Re-export clue types.
pub use clue::{Clue, ClueType};
/// Re-export discovery types.
pub use discovery::{ClueDiscovery, DiscoveryMethod, RevelationDiscovery};
/// Re-export error types.
pub use error::{LoreError, LoreResult};
/// Re-export identifiers.
pub use ids::{CharacterId, ClueId, InvestigationId, RevelationId, SearchTagId};
/// Re-export investigation types.
pub use investigation::{Investigation, InvestigationAssistant, UNSET_ROLL};
/// Re-export revelation types.
pub use revelation::{ClueForRevelation, Revelation};
/// Re-export settings types.
pub use settings::{GameSettings, SettingValue};
/// Re-export the store.
pub use store::LoreStore;
/// Re-export tag types.
pub use tag::SearchTag;
