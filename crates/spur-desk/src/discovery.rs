//! Learning clues and everything that follows from it.
//!
//! [`Desk::mark_discovered`] is the one place a character comes to know a
//! clue. It records the discovery, unlocks any revelations the clue
//! completes, runs the unlock hooks, and retargets the character's other
//! investigations that were chasing the clue.

use spur_core::{
    CharacterId, ClueDiscovery, ClueId, Cost, DiscoveryMethod, InvestigationId, RevelationDiscovery,
    RevelationId,
};

use crate::desk::Desk;
use crate::display;
use crate::error::{DeskError, DeskResult};
use crate::notify::{DISCOVERY, INVESTIGATIONS, Notifier};

/// Message on revelations unlocked by a new clue.
pub const REVELATION_MESSAGE: &str = "You had a revelation after learning a clue!";
/// Message on revelations found by [`Desk::check_missed`].
pub const MISSED_REVELATION_MESSAGE: &str = "You had a revelation which had been missed!";

impl<N: Notifier> Desk<N> {
    /// Record that a character knows a clue and run the cascade.
    ///
    /// A character who already knows the clue has the existing record
    /// updated in place. Returns the revelations unlocked.
    pub fn mark_discovered(&mut self, disco: ClueDiscovery) -> DeskResult<Vec<RevelationId>> {
        let character = disco.character;
        let clue = disco.clue;
        let method = disco.discovery_method.clone();
        let investigation = disco.investigation;
        let revealed_by = disco.revealed_by;

        match self.store.clue_discovery_mut(character, clue) {
            Some(existing) => {
                existing.discovery_method = disco.discovery_method;
                existing.message = disco.message;
                existing.date = disco.date;
                existing.investigation = disco.investigation;
                existing.revealed_by = disco.revealed_by;
            }
            None => self.store.add_clue_discovery(disco)?,
        }
        self.hooks.fire_clue(character, self.store.clue(clue)?);
        tracing::info!(%character, %clue, %method, "clue discovered");

        let mut unlocked = Vec::new();
        let mut msg = String::new();
        for revelation in self.store.revelations_for_clue(clue) {
            if self.store.knows_revelation(character, revelation)
                || !self.store.can_discover_revelation(character, revelation)
            {
                continue;
            }
            let mut rev_disco = RevelationDiscovery::new(revelation, character, method.clone());
            rev_disco.message = REVELATION_MESSAGE.to_string();
            rev_disco.investigation = investigation;
            rev_disco.revealed_by = revealed_by;
            self.store.add_revelation_discovery(rev_disco)?;
            if let Some(rev) = self.store.get_revelation(revelation) {
                msg.push_str(&format!(
                    "\nYou have discovered a revelation: {}\n{}",
                    rev.name, rev.desc
                ));
                self.hooks.fire_revelation(character, rev);
            }
            unlocked.push(revelation);
        }
        if !msg.is_empty() {
            self.notifier.notify(character, &msg, DISCOVERY);
        }

        self.release_targets(character, clue, investigation)?;
        Ok(unlocked)
    }

    /// Clear `clue` as the target of the character's other investigations.
    ///
    /// Active ones are deactivated and their action points refunded.
    fn release_targets(
        &mut self,
        character: CharacterId,
        clue: ClueId,
        except: Option<InvestigationId>,
    ) -> DeskResult<()> {
        let stale: Vec<InvestigationId> = self
            .store
            .investigations_targeting(clue)
            .into_iter()
            .filter(|id| Some(*id) != except)
            .filter(|id| {
                self.store
                    .get_investigation(*id)
                    .is_some_and(|inv| inv.character == character)
            })
            .collect();
        for id in stale {
            let inv = self.store.investigation_mut(id)?;
            inv.clue_target = None;
            if !inv.active {
                continue;
            }
            inv.active = false;
            let refund = std::mem::take(&mut inv.action_points);
            let topic = inv.topic.clone();
            self.store
                .character_mut(character)?
                .refund(&Cost::action_points(refund));
            tracing::debug!(investigation = %id, refund, "investigation target released");
            self.notifier.notify(
                character,
                &format!(
                    "Your investigation into '{topic}' was looking for a clue you have now \
                     discovered. It is no longer active and {refund} action points were refunded."
                ),
                INVESTIGATIONS,
            );
        }
        Ok(())
    }

    /// Share a clue from `sharer` to `recipient`.
    ///
    /// Returns `Ok(false)` and tells the recipient if they already knew it.
    pub fn share(
        &mut self,
        sharer: CharacterId,
        clue: ClueId,
        recipient: CharacterId,
        note: &str,
        investigation: Option<InvestigationId>,
    ) -> DeskResult<bool> {
        let sharer_name = self.store.character_name(sharer).to_string();
        let clue_name = self.store.clue(clue)?.name.clone();
        if self.store.knows_clue(recipient, clue) {
            self.notifier.notify(
                recipient,
                &format!(
                    "{sharer_name} tried to share the clue {clue_name} with you, \
                     but you already know that."
                ),
                DISCOVERY,
            );
            return Ok(false);
        }
        let mut disco = ClueDiscovery::new(clue, recipient, DiscoveryMethod::Sharing);
        disco.message = if note.trim().is_empty() {
            format!("This clue was shared with you by {sharer_name}.")
        } else {
            format!(
                "This clue was shared with you by {sharer_name}, who noted: {}",
                note.trim()
            )
        };
        disco.revealed_by = Some(sharer);
        disco.investigation = investigation;
        self.mark_discovered(disco)?;
        let shown = self
            .store
            .clue_discovery(recipient, clue)
            .map(|d| display::discovery(&self.store, d, false))
            .unwrap_or_default();
        self.notifier.notify(
            recipient,
            &format!("A new clue ({clue}) has been shared with you by {sharer_name}!\n\n{shown}"),
            INVESTIGATIONS,
        );
        Ok(true)
    }

    /// Give a character a clue directly.
    pub fn grant(&mut self, character: CharacterId, clue: ClueId) -> DeskResult<Vec<RevelationId>> {
        if self.store.knows_clue(character, clue) {
            return Err(DeskError::state(format!(
                "{} already knows {}.",
                self.store.character_name(character),
                self.store.clue(clue)?.name
            )));
        }
        let mut disco = ClueDiscovery::new(clue, character, DiscoveryMethod::StaffGrant);
        disco.message = "This clue was given to you by staff.".to_string();
        let unlocked = self.mark_discovered(disco)?;
        self.notifier.notify(
            character,
            &format!("You have learned a new clue: {}", self.store.clue(clue)?.name),
            DISCOVERY,
        );
        Ok(unlocked)
    }

    /// Unlock any revelation the character qualifies for but never received.
    pub fn check_missed(&mut self, character: CharacterId) -> DeskResult<Vec<RevelationId>> {
        self.store.character(character)?;
        let missed: Vec<RevelationId> = self
            .store
            .revelations()
            .into_iter()
            .map(|r| r.id)
            .filter(|id| {
                !self.store.knows_revelation(character, *id)
                    && self.store.can_discover_revelation(character, *id)
            })
            .collect();
        for &revelation in &missed {
            let mut disco =
                RevelationDiscovery::new(revelation, character, DiscoveryMethod::CheckedForMissing);
            disco.message = MISSED_REVELATION_MESSAGE.to_string();
            self.store.add_revelation_discovery(disco)?;
            if let Some(rev) = self.store.get_revelation(revelation) {
                self.hooks.fire_revelation(character, rev);
                self.notifier.notify(
                    character,
                    &format!("You have discovered a revelation: {}\n{}", rev.name, rev.desc),
                    DISCOVERY,
                );
            }
        }
        if !missed.is_empty() {
            tracing::info!(%character, count = missed.len(), "missed revelations unlocked");
        }
        Ok(missed)
    }
}
