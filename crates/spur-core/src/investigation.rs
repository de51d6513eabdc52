use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::character::Cost;
use crate::ids::{CharacterId, ClueId, InvestigationId};

/// Sentinel stored in [`Investigation::roll`] before this week's roll happens.
pub const UNSET_ROLL: i32 = -9999;

/// Completion value of an investigation that has no target yet.
pub const DEFAULT_COMPLETION_VALUE: i32 = 300;

/// Stat used when a player picks none.
pub const DEFAULT_STAT: &str = "perception";

/// Skill used when a player picks none. Always folded into investigation rolls.
pub const DEFAULT_SKILL: &str = "investigation";

/// A character helping with someone else's investigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationAssistant {
    /// The helper. May be a retainer.
    pub character: CharacterId,
    /// Stat the helper rolls.
    pub stat_used: String,
    /// Skill the helper rolls.
    pub skill_used: String,
    /// The helper's write-up of what they do.
    pub actions: String,
    /// Whether the helper contributes this week.
    pub currently_helping: bool,
}

impl InvestigationAssistant {
    /// An invited helper who has not yet agreed to help.
    pub fn new(character: CharacterId) -> Self {
        Self {
            character,
            stat_used: DEFAULT_STAT.to_string(),
            skill_used: DEFAULT_SKILL.to_string(),
            actions: String::new(),
            currently_helping: false,
        }
    }
}

/// A character's ongoing attempt to uncover a clue, resolved once a week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investigation {
    /// Unique identifier.
    pub id: InvestigationId,
    /// The investigating character.
    pub character: CharacterId,
    /// Search topic: `tag/tag/-omit` or `clue:<name>`.
    pub topic: String,
    /// The player's write-up of what they do.
    pub actions: String,
    /// Stat the investigator rolls.
    pub stat_used: String,
    /// Skill the investigator rolls.
    pub skill_used: String,
    /// Silver committed this week.
    pub silver: u64,
    /// Economic resources committed this week.
    pub economic: u32,
    /// Military resources committed this week.
    pub military: u32,
    /// Social resources committed this week.
    pub social: u32,
    /// Action points committed this week.
    pub action_points: u32,
    /// This week's roll, or [`UNSET_ROLL`].
    pub roll: i32,
    /// The clue being pursued, resolved lazily.
    pub clue_target: Option<ClueId>,
    /// Accumulated partial credit.
    pub progress: i32,
    /// Progress needed to find the target.
    pub completion_value: i32,
    /// Whether this is the character's chosen activity this week.
    pub active: bool,
    /// Whether the investigation is still being pursued.
    pub ongoing: bool,
    /// Whether weekly processing decides the result. False when a GM runs it.
    pub automate_result: bool,
    /// The last result text sent to the player.
    pub results: String,
    /// Invited and active helpers.
    pub assistants: Vec<InvestigationAssistant>,
    /// When the investigation was started.
    pub created_at: DateTime<Utc>,
}

impl Investigation {
    /// A new, inactive investigation into `topic`.
    pub fn new(character: CharacterId, topic: impl Into<String>) -> Self {
        Self {
            id: InvestigationId::new(),
            character,
            topic: topic.into(),
            actions: String::new(),
            stat_used: DEFAULT_STAT.to_string(),
            skill_used: DEFAULT_SKILL.to_string(),
            silver: 0,
            economic: 0,
            military: 0,
            social: 0,
            action_points: 0,
            roll: UNSET_ROLL,
            clue_target: None,
            progress: 0,
            completion_value: DEFAULT_COMPLETION_VALUE,
            active: false,
            ongoing: true,
            automate_result: true,
            results: "You didn't find anything.".to_string(),
            assistants: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether this week's roll has been made.
    pub fn roll_is_set(&self) -> bool {
        self.roll != UNSET_ROLL
    }

    /// Resources committed this week, as a refundable cost.
    pub fn committed(&self) -> Cost {
        Cost {
            silver: self.silver,
            action_points: self.action_points,
            economic: self.economic,
            military: self.military,
            social: self.social,
        }
    }

    /// End-of-week reset: zero committed resources, deactivate, clear the roll.
    pub fn reset_values(&mut self) {
        self.active = false;
        self.silver = 0;
        self.economic = 0;
        self.military = 0;
        self.social = 0;
        self.action_points = 0;
        self.roll = UNSET_ROLL;
    }

    /// Helpers who are contributing this week.
    pub fn active_assistants(&self) -> impl Iterator<Item = &InvestigationAssistant> {
        self.assistants.iter().filter(|a| a.currently_helping)
    }

    /// The assistant record for `character`, if one exists.
    pub fn assistant(&self, character: CharacterId) -> Option<&InvestigationAssistant> {
        self.assistants.iter().find(|a| a.character == character)
    }

    /// Mutable assistant record for `character`.
    pub fn assistant_mut(&mut self, character: CharacterId) -> Option<&mut InvestigationAssistant> {
        self.assistants.iter_mut().find(|a| a.character == character)
    }

    /// Progress toward completion as a whole percentage.
    pub fn progress_percentage(&self) -> i32 {
        if self.completion_value <= 0 {
            return 0;
        }
        ((f64::from(self.progress) / f64::from(self.completion_value)) * 100.0) as i32
    }

    /// A player-facing description of how close the investigation is.
    pub fn progress_str(&self) -> &'static str {
        match self.progress_percentage() {
            ..=0 => "No real progress has been made to finding something new.",
            1..=5 => "You have made a very tiny amount of progress.",
            6..=10 => "You have made a tiny amount of progress.",
            11..=15 => "You have made a little bit of progress.",
            16..=25 => "You've made some progress.",
            26..=50 => "You've made a good amount of progress.",
            51..=75 => "You feel like you're getting close to finding something.",
            _ => "You feel like you're on the verge of a breakthrough. You just need more time.",
        }
    }
}

impl fmt::Display for Investigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "investigation {} on {}", self.id, self.topic)
    }
}
