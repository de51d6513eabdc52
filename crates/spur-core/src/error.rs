use crate::ids::{CharacterId, ClueId, InvestigationId, RevelationId, SearchTagId};

/// Alias for `Result<T, LoreError>`.
pub type LoreResult<T> = Result<T, LoreError>;

/// Errors that can occur when manipulating the lore store.
#[derive(Debug, thiserror::Error)]
pub enum LoreError {
    /// The requested clue does not exist.
    #[error("clue not found: {0}")]
    ClueNotFound(ClueId),

    /// The requested revelation does not exist.
    #[error("revelation not found: {0}")]
    RevelationNotFound(RevelationId),

    /// The requested character does not exist.
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),

    /// The requested investigation does not exist.
    #[error("investigation not found: {0}")]
    InvestigationNotFound(InvestigationId),

    /// The requested search tag does not exist.
    #[error("search tag not found: {0}")]
    SearchTagNotFound(SearchTagId),

    /// A name or ID prefix matched nothing.
    #[error("nothing matches \"{0}\"")]
    NoMatch(String),

    /// A name or ID prefix matched more than one record.
    #[error("\"{0}\" matches more than one record")]
    Ambiguous(String),

    /// A record with the same unique name already exists.
    #[error("name already in use: \"{0}\"")]
    DuplicateName(String),

    /// The character already has a discovery for this clue.
    #[error("character {character} already knows clue {clue}")]
    AlreadyDiscovered {
        /// The clue that was already discovered.
        clue: ClueId,
        /// The character who knows it.
        character: CharacterId,
    },

    /// The character already has a discovery for this revelation.
    #[error("character {character} already knows revelation {revelation}")]
    RevelationAlreadyDiscovered {
        /// The revelation that was already discovered.
        revelation: RevelationId,
        /// The character who knows it.
        character: CharacterId,
    },

    /// The character is already recorded as an assistant on this investigation.
    #[error("character {character} is already assisting investigation {investigation}")]
    DuplicateAssistant {
        /// The investigation being assisted.
        investigation: InvestigationId,
        /// The assisting character.
        character: CharacterId,
    },

    /// A character cannot pay for something.
    #[error("not enough {resource}: {needed} needed, {available} available")]
    Insufficient {
        /// The resource that ran short.
        resource: String,
        /// How much was required.
        needed: u64,
        /// How much the character has.
        available: u64,
    },

    /// A generic validation error with a descriptive message.
    #[error("{0}")]
    Validation(String),
}
