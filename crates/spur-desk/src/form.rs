//! The draft of a new investigation, filled in one command at a time.

use spur_core::{ClueId, LoreStore};
use spur_mechanics::{is_valid_skill, is_valid_stat};

use crate::error::{DeskError, DeskResult};
use crate::target::TopicSearch;

/// Where a form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStage {
    /// Fields are being filled in.
    #[default]
    Drafting,
    /// The topic needs a new clue written and the player has been asked to
    /// finish again to accept the extra cost.
    AwaitingConfirmation,
}

/// A draft investigation.
#[derive(Debug, Clone, Default)]
pub struct InvestigationForm {
    /// Topic as typed.
    pub topic: String,
    /// Parsed topic, once one has been accepted.
    pub search: Option<TopicSearch>,
    /// A clue the topic matched when it was set, if any.
    pub candidate: Option<ClueId>,
    /// What the character does to investigate.
    pub story: String,
    /// Chosen stat.
    pub stat: Option<String>,
    /// Chosen skill.
    pub skill: Option<String>,
    stage: FormStage,
}

impl InvestigationForm {
    /// A blank form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage.
    pub fn stage(&self) -> FormStage {
        self.stage
    }

    /// Accept a parsed topic. Any pending confirmation is dropped.
    pub fn set_topic(&mut self, text: &str, search: TopicSearch, candidate: Option<ClueId>) {
        self.topic = text.trim().to_string();
        self.search = Some(search);
        self.candidate = candidate;
        self.stage = FormStage::Drafting;
    }

    /// Set the story.
    pub fn set_story(&mut self, story: &str) {
        self.story = story.trim().to_string();
    }

    /// Set the stat, which must be a real stat name.
    pub fn set_stat(&mut self, stat: &str) -> DeskResult<()> {
        if !is_valid_stat(stat) {
            return Err(DeskError::invalid(format!(
                "No stat by the name of {}.",
                stat.trim()
            )));
        }
        self.stat = Some(stat.trim().to_lowercase());
        Ok(())
    }

    /// Set the skill, which must be a real skill name.
    pub fn set_skill(&mut self, skill: &str) -> DeskResult<()> {
        if !is_valid_skill(skill) {
            return Err(DeskError::invalid(format!(
                "No skill by the name of {}.",
                skill.trim()
            )));
        }
        self.skill = Some(skill.trim().to_lowercase());
        Ok(())
    }

    /// Whether finishing would have to create a placeholder clue.
    pub fn needs_new_clue(&self) -> bool {
        self.search.is_some() && self.candidate.is_none()
    }

    /// Fail with the first missing field.
    pub fn check_complete(&self) -> DeskResult<&TopicSearch> {
        let Some(search) = self.search.as_ref() else {
            return Err(DeskError::invalid("You must have topic defined."));
        };
        if self.story.is_empty() {
            return Err(DeskError::invalid("You must have a story defined."));
        }
        Ok(search)
    }

    /// Ask for, or consume, confirmation of a new clue.
    ///
    /// The first call moves to [`FormStage::AwaitingConfirmation`] and
    /// returns false. The next call returns true and goes back to drafting,
    /// so a refused attempt has to be confirmed again.
    pub fn confirm_new_clue(&mut self) -> bool {
        match self.stage {
            FormStage::Drafting => {
                self.stage = FormStage::AwaitingConfirmation;
                false
            }
            FormStage::AwaitingConfirmation => {
                self.stage = FormStage::Drafting;
                true
            }
        }
    }

    /// The form as shown to the player.
    pub fn display(&self, store: &LoreStore) -> String {
        let topic = self
            .search
            .as_ref()
            .map(|s| s.describe(store))
            .unwrap_or_default();
        let story = if self.story.is_empty() {
            "Story unfinished."
        } else {
            &self.story
        };
        let header = format!("Creating an investigation: {topic}");
        format!(
            "{}\n{story}\nStat: {} - Skill: {}",
            header.trim_end(),
            self.stat.as_deref().unwrap_or("???"),
            self.skill.as_deref().unwrap_or("???"),
        )
    }
}
