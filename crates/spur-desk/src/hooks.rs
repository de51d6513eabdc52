//! Handlers that run when a character learns something.
//!
//! Abilities, spells, and other unlocks tied to lore live outside the desk.
//! They register an [`UnlockHandler`] and get called from the discovery
//! cascade for the new clue and for each revelation it completes.

use std::fmt;

use spur_core::{CharacterId, Clue, Revelation};

/// Reacts to new discoveries. Both methods default to doing nothing.
pub trait UnlockHandler {
    /// A character learned a clue.
    fn on_clue(&mut self, _character: CharacterId, _clue: &Clue) {}

    /// A character learned a revelation.
    fn on_revelation(&mut self, _character: CharacterId, _revelation: &Revelation) {}
}

/// The registered unlock handlers, called in registration order.
#[derive(Default)]
pub struct UnlockHooks {
    handlers: Vec<Box<dyn UnlockHandler>>,
}

impl UnlockHooks {
    /// No handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler.
    pub fn register(&mut self, handler: impl UnlockHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn fire_clue(&mut self, character: CharacterId, clue: &Clue) {
        for handler in &mut self.handlers {
            handler.on_clue(character, clue);
        }
    }

    pub(crate) fn fire_revelation(&mut self, character: CharacterId, revelation: &Revelation) {
        for handler in &mut self.handlers {
            handler.on_revelation(character, revelation);
        }
    }
}

impl fmt::Debug for UnlockHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockHooks")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Logs every unlock at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogUnlocks;

impl UnlockHandler for LogUnlocks {
    fn on_clue(&mut self, character: CharacterId, clue: &Clue) {
        tracing::info!(%character, clue = %clue.id, "clue unlocked: {}", clue.name);
    }

    fn on_revelation(&mut self, character: CharacterId, revelation: &Revelation) {
        tracing::info!(
            %character,
            revelation = %revelation.id,
            "revelation unlocked: {}",
            revelation.name
        );
    }
}
