use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LoreError, LoreResult};
use crate::ids::CharacterId;

/// Whether a character is played or is an NPC retainer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    /// A character controlled by a player.
    #[default]
    Player,
    /// An NPC retainer serving another character.
    Retainer {
        /// The character the retainer serves.
        owner: CharacterId,
        /// Level of the `investigation_assistant` ability.
        assistant_level: u32,
    },
}

/// The three domain resource pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Economic resources.
    Economic,
    /// Military resources.
    Military,
    /// Social resources.
    Social,
}

impl ResourceKind {
    /// Every resource kind, in display order.
    pub const ALL: [ResourceKind; 3] = [Self::Economic, Self::Military, Self::Social];

    /// Parse a resource name, accepting unambiguous prefixes like `econ`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if s.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string().starts_with(&s))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Economic => write!(f, "economic"),
            Self::Military => write!(f, "military"),
            Self::Social => write!(f, "social"),
        }
    }
}

/// A bundle of resources to charge or refund in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cost {
    /// Silver pieces.
    pub silver: u64,
    /// Action points.
    pub action_points: u32,
    /// Economic resources.
    pub economic: u32,
    /// Military resources.
    pub military: u32,
    /// Social resources.
    pub social: u32,
}

impl Cost {
    /// A cost of only action points.
    pub fn action_points(amount: u32) -> Self {
        Self {
            action_points: amount,
            ..Self::default()
        }
    }

    /// A cost of only silver.
    pub fn silver(amount: u64) -> Self {
        Self {
            silver: amount,
            ..Self::default()
        }
    }

    /// A cost in a single resource pool.
    pub fn resource(kind: ResourceKind, amount: u32) -> Self {
        let mut cost = Self::default();
        match kind {
            ResourceKind::Economic => cost.economic = amount,
            ResourceKind::Military => cost.military = amount,
            ResourceKind::Social => cost.social = amount,
        }
        cost
    }

    /// Whether nothing is charged.
    pub fn is_free(&self) -> bool {
        *self == Self::default()
    }
}

/// The game data of a roster entry that investigations need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Unique identifier.
    pub id: CharacterId,
    /// Display name, unique case-insensitively.
    pub name: String,
    /// Player character or retainer.
    pub kind: CharacterKind,
    /// Stat ratings keyed by lowercase name.
    pub stats: HashMap<String, u32>,
    /// Skill ratings keyed by lowercase name.
    pub skills: HashMap<String, u32>,
    /// Unspent action points.
    pub action_points: u32,
    /// Silver on hand.
    pub silver: u64,
    /// Economic resources on hand.
    pub economic: u32,
    /// Military resources on hand.
    pub military: u32,
    /// Social resources on hand.
    pub social: u32,
}

impl Character {
    /// Create a player character with an empty sheet and a full week of AP.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            kind: CharacterKind::Player,
            stats: HashMap::new(),
            skills: HashMap::new(),
            action_points: 100,
            silver: 0,
            economic: 0,
            military: 0,
            social: 0,
        }
    }

    /// Create a retainer serving `owner`.
    pub fn retainer(name: impl Into<String>, owner: CharacterId, assistant_level: u32) -> Self {
        Self {
            kind: CharacterKind::Retainer {
                owner,
                assistant_level,
            },
            ..Self::new(name)
        }
    }

    /// Set a stat rating.
    pub fn with_stat(mut self, name: &str, value: u32) -> Self {
        self.stats.insert(name.to_lowercase(), value);
        self
    }

    /// Set a skill rating.
    pub fn with_skill(mut self, name: &str, value: u32) -> Self {
        self.skills.insert(name.to_lowercase(), value);
        self
    }

    /// Set the character's purse.
    pub fn with_resources(mut self, silver: u64, economic: u32, military: u32, social: u32) -> Self {
        self.silver = silver;
        self.economic = economic;
        self.military = military;
        self.social = social;
        self
    }

    /// Set unspent action points.
    pub fn with_action_points(mut self, action_points: u32) -> Self {
        self.action_points = action_points;
        self
    }

    /// Stat rating, 0 if the character lacks it.
    pub fn stat(&self, name: &str) -> u32 {
        self.stats.get(&name.to_lowercase()).copied().unwrap_or(0)
    }

    /// Skill rating, 0 if the character lacks it.
    pub fn skill(&self, name: &str) -> u32 {
        self.skills.get(&name.to_lowercase()).copied().unwrap_or(0)
    }

    /// Whether this is a played character rather than a retainer.
    pub fn is_player(&self) -> bool {
        self.kind == CharacterKind::Player
    }

    /// The retainer's `investigation_assistant` level, 0 for player characters.
    pub fn assistant_level(&self) -> u32 {
        match self.kind {
            CharacterKind::Retainer {
                assistant_level, ..
            } => assistant_level,
            CharacterKind::Player => 0,
        }
    }

    /// The character who receives discoveries on this character's behalf.
    ///
    /// Retainers hand what they learn to their owner.
    pub fn discovery_recipient(&self) -> CharacterId {
        match self.kind {
            CharacterKind::Retainer { owner, .. } => owner,
            CharacterKind::Player => self.id,
        }
    }

    /// Amount held of a resource pool.
    pub fn resource(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Economic => self.economic,
            ResourceKind::Military => self.military,
            ResourceKind::Social => self.social,
        }
    }

    /// Check that every part of `cost` is affordable without changing anything.
    pub fn check_cost(&self, cost: &Cost) -> LoreResult<()> {
        let checks = [
            ("silver", cost.silver, self.silver),
            (
                "action points",
                u64::from(cost.action_points),
                u64::from(self.action_points),
            ),
            ("economic resources", u64::from(cost.economic), u64::from(self.economic)),
            ("military resources", u64::from(cost.military), u64::from(self.military)),
            ("social resources", u64::from(cost.social), u64::from(self.social)),
        ];
        for (resource, needed, available) in checks {
            if needed > available {
                return Err(LoreError::Insufficient {
                    resource: resource.to_string(),
                    needed,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Deduct `cost`. Either every component is paid or nothing changes.
    pub fn pay(&mut self, cost: &Cost) -> LoreResult<()> {
        self.check_cost(cost)?;
        self.silver -= cost.silver;
        self.action_points -= cost.action_points;
        self.economic -= cost.economic;
        self.military -= cost.military;
        self.social -= cost.social;
        Ok(())
    }

    /// Give back a previously paid cost.
    pub fn refund(&mut self, cost: &Cost) {
        self.silver = self.silver.saturating_add(cost.silver);
        self.action_points = self.action_points.saturating_add(cost.action_points);
        self.economic = self.economic.saturating_add(cost.economic);
        self.military = self.military.saturating_add(cost.military);
        self.social = self.social.saturating_add(cost.social);
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
