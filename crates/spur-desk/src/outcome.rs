//! What happens to an investigation at the end of a week.

use spur_core::{ClueDiscovery, ClueId, DiscoveryMethod, InvestigationId, RevelationId};

use crate::desk::Desk;
use crate::display;
use crate::error::DeskResult;
use crate::notify::{INVESTIGATIONS, Notifier};
use crate::target::CLUE_TOPIC_PREFIX;

/// Results text when a target-less investigation succeeds.
pub const NOTHING_TO_FIND: &str = "There is nothing else for you to find.";

/// The result of one week of an investigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The roll beat the completion value.
    Success {
        /// The clue found, if there was one to find.
        clue: Option<ClueId>,
        /// Revelations the clue unlocked.
        revelations: Vec<RevelationId>,
    },
    /// No clue, but the roll was added to progress.
    FailureWithProgress {
        /// Progress gained.
        gained: i32,
    },
    /// No clue and no progress.
    FailureNoProgress,
    /// Staff wrote the result by hand. The investigation is over.
    GmResolved,
}

impl Outcome {
    /// Whether the roll succeeded. GM-resolved weeks are neither.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether the roll failed.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::FailureWithProgress { .. } | Self::FailureNoProgress
        )
    }
}

impl<N: Notifier> Desk<N> {
    /// Whether this week's roll plus progress is enough.
    ///
    /// With `diff` the roll is measured against `diff + modifier` instead
    /// of the completion value.
    pub fn check_success(
        &mut self,
        id: InvestigationId,
        modifier: i32,
        diff: Option<i32>,
    ) -> DeskResult<bool> {
        let roll = self.get_roll(id)?;
        let inv = self.store.investigation(id)?;
        let total = roll.saturating_add(inv.progress);
        Ok(match diff {
            Some(diff) => total >= diff.saturating_add(modifier),
            None => total >= inv.completion_value,
        })
    }

    /// Add a positive roll to progress. Only investigations with a target
    /// make progress.
    pub fn add_progress(&mut self, id: InvestigationId) -> DeskResult<Option<i32>> {
        let inv = self.store.investigation_mut(id)?;
        if inv.clue_target.is_none() || !inv.roll_is_set() || inv.roll <= 0 {
            return Ok(None);
        }
        inv.progress = inv.progress.saturating_add(inv.roll);
        Ok(Some(inv.roll))
    }

    /// Decide the week and write the results text.
    pub fn generate_result(&mut self, id: InvestigationId) -> DeskResult<Outcome> {
        if !self.store.investigation(id)?.automate_result {
            self.store.investigation_mut(id)?.ongoing = false;
            return Ok(Outcome::GmResolved);
        }
        let target = self.retarget(id)?;
        if !self.check_success(id, 0, None)? {
            let mut results = String::from("Your investigation failed to find anything.");
            let outcome = match self.add_progress(id)? {
                Some(gained) => {
                    results.push_str(" But you feel you've made some progress in following some leads.");
                    Outcome::FailureWithProgress { gained }
                }
                None => {
                    results.push_str(" None of your leads seemed to go anywhere this week.");
                    Outcome::FailureNoProgress
                }
            };
            results.push_str(" To continue the investigation, set it active again.");
            self.store.investigation_mut(id)?.results = results;
            return Ok(outcome);
        }
        let Some(clue) = target else {
            self.store.investigation_mut(id)?.results = NOTHING_TO_FIND.to_string();
            return Ok(Outcome::Success {
                clue: None,
                revelations: Vec::new(),
            });
        };

        let owner = self.store.investigation(id)?.character;
        let message = self
            .store
            .clue_discovery(owner, clue)
            .map(|d| d.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Your investigation has discovered this!".to_string());
        let mut disco = ClueDiscovery::new(clue, owner, DiscoveryMethod::Investigation);
        disco.message = message;
        disco.investigation = Some(id);
        let revelations = self.mark_discovered(disco)?;

        let mut results = String::from("Your investigation has discovered a clue!\n");
        if let Some(found) = self.store.clue_discovery(owner, clue) {
            results.push_str(&display::discovery(&self.store, found, false));
        }
        results.push_str(&self.topic_relation(id, clue)?);
        let inv = self.store.investigation_mut(id)?;
        inv.results = results;
        inv.clue_target = None;
        inv.ongoing = false;
        tracing::info!(investigation = %id, %clue, "investigation succeeded");

        self.share_with_assistants(id, clue)?;
        Ok(Outcome::Success {
            clue: Some(clue),
            revelations,
        })
    }

    /// For `clue:` topics, how the find relates to the clue asked about.
    fn topic_relation(&self, id: InvestigationId, found: ClueId) -> DeskResult<String> {
        let topic = &self.store.investigation(id)?.topic;
        let Some(name) = topic
            .to_lowercase()
            .strip_prefix(CLUE_TOPIC_PREFIX)
            .map(|rest| rest.trim().to_string())
        else {
            return Ok(String::new());
        };
        let Some(source) = self
            .store
            .resolve_clue(&name)
            .ok()
            .and_then(|c| self.store.get_clue(c))
        else {
            return Ok(String::new());
        };
        let found = self.store.clue(found)?;
        let shared: std::collections::BTreeSet<_> = found
            .search_tags
            .intersection(&source.search_tags)
            .copied()
            .collect();
        if shared.is_empty() {
            return Ok(format!(
                "\nIt's not immediately clear how this relates to {}, but you found this \
                 while trying to learn more about it.",
                source.name
            ));
        }
        Ok(format!(
            "\nWhile looking into {}, you found some references to '{}' that resulted in \
             your discovery.",
            source.name,
            self.store.tag_names(&shared).join(", ")
        ))
    }

    /// Pass a found clue to everyone helping. They stop helping afterwards.
    fn share_with_assistants(&mut self, id: InvestigationId, clue: ClueId) -> DeskResult<()> {
        let inv = self.store.investigation(id)?;
        let owner = inv.character;
        let helpers: Vec<_> = inv.active_assistants().map(|a| a.character).collect();
        for helper in helpers {
            if let Some(assistant) = self.store.investigation_mut(id)?.assistant_mut(helper) {
                assistant.currently_helping = false;
            }
            let Some(recipient) = self
                .store
                .get_character(helper)
                .map(|c| c.discovery_recipient())
            else {
                continue;
            };
            if recipient == owner {
                continue;
            }
            if let Err(err) = self.share(owner, clue, recipient, "", Some(id)) {
                tracing::warn!(investigation = %id, %helper, %err, "could not share with assistant");
            }
        }
        Ok(())
    }

    /// Run the week for one investigation: decide it, reset it, and tell
    /// the owner.
    pub fn process_events(&mut self, id: InvestigationId) -> DeskResult<Outcome> {
        let outcome = self.generate_result(id)?;
        let inv = self.store.investigation_mut(id)?;
        inv.reset_values();
        let owner = inv.character;
        let msg = format!(
            "Your investigation into '{}' has had the following result:\n{}",
            inv.topic, inv.results
        );
        self.notifier.notify(owner, &msg, INVESTIGATIONS);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spur_core::{
        Character, CharacterId, Clue, GameSettings, Investigation, InvestigationAssistant,
        LoreStore, SearchTag, UNSET_ROLL,
    };
    use spur_mechanics::FixedCheck;

    use crate::config::DeskConfig;

    struct World {
        desk: Desk,
        mira: CharacterId,
        tobin: CharacterId,
        nest: ClueId,
        inv: InvestigationId,
    }

    /// Mira investigates rats. Tobin already knows an unrelated clue, so
    /// completion values equal clue ratings.
    fn world(rating: u32, dice: i32) -> World {
        let mut store = LoreStore::new();
        let mira = store.add_character(Character::new("Mira")).unwrap();
        let tobin = store.add_character(Character::new("Tobin")).unwrap();
        let rats = store.add_tag(SearchTag::new("rats")).unwrap();
        let nest = store
            .add_clue(Clue::new("Rat Nest", rating).investigable(true).with_tag(rats))
            .unwrap();
        let well = store
            .add_clue(Clue::new("Old Well", 20).investigable(true))
            .unwrap();
        store
            .add_clue_discovery(ClueDiscovery::new(well, tobin, DiscoveryMethod::StaffGrant))
            .unwrap();
        let mut inv = Investigation::new(mira, "rats");
        inv.active = true;
        let inv = store.add_investigation(inv).unwrap();
        let desk = Desk::new(store, GameSettings::new(), DeskConfig::default())
            .with_dice(FixedCheck::new(dice));
        World {
            desk,
            mira,
            tobin,
            nest,
            inv,
        }
    }

    #[test]
    fn success_discovers_the_target() {
        let mut w = world(20, 10_000);
        let outcome = w.desk.process_events(w.inv).unwrap();
        assert_eq!(
            outcome,
            Outcome::Success {
                clue: Some(w.nest),
                revelations: Vec::new()
            }
        );
        let store = w.desk.store();
        let disco = store.clue_discovery(w.mira, w.nest).unwrap();
        assert_eq!(disco.discovery_method, DiscoveryMethod::Investigation);
        assert_eq!(disco.investigation, Some(w.inv));
        assert_eq!(disco.message, "Your investigation has discovered this!");
        let inv = store.investigation(w.inv).unwrap();
        assert!(!inv.ongoing);
        assert!(!inv.active);
        assert_eq!(inv.clue_target, None);
        assert_eq!(inv.roll, UNSET_ROLL);
        let note = &w.desk.notifier().for_character(w.mira)[0];
        assert_eq!(note.category, INVESTIGATIONS);
        assert!(note.message.starts_with(
            "Your investigation into 'rats' has had the following result:\n\
             Your investigation has discovered a clue!\n[Rat Nest]"
        ));
    }

    #[test]
    fn helpers_get_the_clue_and_stop_helping() {
        let mut w = world(20, 10_000);
        let pip = w
            .desk
            .store_mut()
            .add_character(Character::retainer("Pip", w.mira, 1))
            .unwrap();
        for helper in [w.tobin, pip] {
            let mut assistant = InvestigationAssistant::new(helper);
            assistant.currently_helping = true;
            w.desk.store_mut().add_assistant(w.inv, assistant).unwrap();
        }
        w.desk.process_events(w.inv).unwrap();
        let store = w.desk.store();
        let shared = store.clue_discovery(w.tobin, w.nest).unwrap();
        assert_eq!(shared.discovery_method, DiscoveryMethod::Sharing);
        assert_eq!(shared.revealed_by, Some(w.mira));
        assert_eq!(shared.investigation, Some(w.inv));
        let inv = store.investigation(w.inv).unwrap();
        assert_eq!(inv.active_assistants().count(), 0);
        // Pip reports to Mira, who found it herself.
        assert!(store.clue_discovery(pip, w.nest).is_none());
    }

    #[test]
    fn failure_with_target_adds_progress() {
        let mut w = world(100_000, 500);
        let outcome = w.desk.process_events(w.inv).unwrap();
        let Outcome::FailureWithProgress { gained } = outcome else {
            panic!("expected progress, got {outcome:?}");
        };
        assert!(gained > 500);
        let inv = w.desk.store().investigation(w.inv).unwrap();
        assert_eq!(inv.progress, gained);
        assert!(inv.ongoing);
        assert!(!inv.active);
        assert_eq!(
            inv.results,
            "Your investigation failed to find anything. But you feel you've made some \
             progress in following some leads. To continue the investigation, set it active again."
        );
    }

    #[test]
    fn failure_without_target_makes_no_progress() {
        let mut w = world(20, -10_000);
        let inv = w.desk.store_mut().investigation_mut(w.inv).unwrap();
        inv.topic = "gossip".to_string();
        inv.completion_value = 10_000;
        let outcome = w.desk.process_events(w.inv).unwrap();
        assert_eq!(outcome, Outcome::FailureNoProgress);
        let inv = w.desk.store().investigation(w.inv).unwrap();
        assert_eq!(inv.progress, 0);
        assert!(inv.results.contains("None of your leads seemed to go anywhere this week."));
    }

    #[test]
    fn success_without_target_finds_nothing() {
        let mut w = world(20, 10_000);
        w.desk.store_mut().investigation_mut(w.inv).unwrap().topic = "gossip".to_string();
        let outcome = w.desk.generate_result(w.inv).unwrap();
        assert!(outcome.is_success());
        let inv = w.desk.store().investigation(w.inv).unwrap();
        assert_eq!(inv.results, NOTHING_TO_FIND);
        assert!(inv.ongoing);
    }

    #[test]
    fn gm_written_result_ends_the_investigation() {
        let mut w = world(20, 10_000);
        let inv = w.desk.store_mut().investigation_mut(w.inv).unwrap();
        inv.automate_result = false;
        inv.results = "You find a secret door.".to_string();
        assert_eq!(w.desk.process_events(w.inv).unwrap(), Outcome::GmResolved);
        assert!(!w.desk.store().investigation(w.inv).unwrap().ongoing);
        assert!(w.desk.store().clue_discovery(w.mira, w.nest).is_none());
        let note = &w.desk.notifier().for_character(w.mira)[0];
        assert!(note.message.ends_with("You find a secret door."));
    }

    #[test]
    fn explicit_difficulty_replaces_completion_value() {
        let mut w = world(100_000, 500);
        w.desk.targeted_clue(w.inv).unwrap();
        assert!(!w.desk.check_success(w.inv, 0, None).unwrap());
        assert!(w.desk.check_success(w.inv, 0, Some(10)).unwrap());
        assert!(!w.desk.check_success(w.inv, 1_000_000, Some(10)).unwrap());
    }

    #[test]
    fn clue_topic_explains_the_link() {
        let mut w = world(20, 10_000);
        let store = w.desk.store_mut();
        let rats = store.find_tag("rats").unwrap().id;
        let source = store
            .add_clue(Clue::new("Gnawed Rope", 10).with_tag(rats))
            .unwrap();
        store
            .add_clue_discovery(ClueDiscovery::new(source, w.mira, DiscoveryMethod::StaffGrant))
            .unwrap();
        store.investigation_mut(w.inv).unwrap().topic = "clue:Gnawed Rope".to_string();
        store.investigation_mut(w.inv).unwrap().clue_target = Some(w.nest);
        w.desk.generate_result(w.inv).unwrap();
        let results = &w.desk.store().investigation(w.inv).unwrap().results;
        assert!(results.ends_with(
            "While looking into Gnawed Rope, you found some references to 'rats' that \
             resulted in your discovery."
        ));
    }

    #[test]
    fn clue_topic_without_shared_tags() {
        let mut w = world(20, 10_000);
        let store = w.desk.store_mut();
        let source = store.add_clue(Clue::new("Cracked Bell", 10)).unwrap();
        store
            .add_clue_discovery(ClueDiscovery::new(source, w.mira, DiscoveryMethod::StaffGrant))
            .unwrap();
        store.investigation_mut(w.inv).unwrap().topic = "clue:Cracked Bell".to_string();
        store.investigation_mut(w.inv).unwrap().clue_target = Some(w.nest);
        w.desk.generate_result(w.inv).unwrap();
        let results = &w.desk.store().investigation(w.inv).unwrap().results;
        assert!(results.ends_with(
            "It's not immediately clear how this relates to Cracked Bell, but you found this \
             while trying to learn more about it."
        ));
    }
}
