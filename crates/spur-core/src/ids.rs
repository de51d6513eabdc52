use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random ID.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Whether the hyphenated form of this ID starts with `prefix`.
            ///
            /// Players type the short form printed by `Display`, so lookups
            /// by prefix are case-insensitive and reject empty input.
            pub fn matches_prefix(&self, prefix: &str) -> bool {
                let prefix = prefix.trim().to_lowercase();
                !prefix.is_empty() && self.0.to_string().starts_with(&prefix)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", &self.0.to_string()[..8])
            }
        }
    };
}

record_id!(
    /// Unique identifier for a search tag.
    SearchTagId
);
record_id!(
    /// Unique identifier for a clue.
    ClueId
);
record_id!(
    /// Unique identifier for a revelation.
    RevelationId
);
record_id!(
    /// Unique identifier for a character (a roster entry).
    CharacterId
);
record_id!(
    /// Unique identifier for an investigation.
    InvestigationId
);
