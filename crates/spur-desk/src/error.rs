//! Error types for the investigation desk.

use thiserror::Error;

use spur_core::LoreError;

/// Result type for desk operations.
pub type DeskResult<T> = Result<T, DeskError>;

/// A command the player can't carry out. The message is shown as-is.
#[derive(Debug, Error)]
pub enum DeskError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Invalid(String),

    /// The character can't afford it.
    #[error("{0}")]
    Insufficient(String),

    /// The records aren't in a state that allows it.
    #[error("{0}")]
    State(String),

    /// Unknown command word or switch.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Store error.
    #[error("{0}")]
    Lore(#[from] LoreError),
}

impl DeskError {
    /// Shorthand for [`DeskError::Invalid`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Shorthand for [`DeskError::State`].
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Shorthand for [`DeskError::Insufficient`].
    pub fn insufficient(msg: impl Into<String>) -> Self {
        Self::Insufficient(msg.into())
    }
}
