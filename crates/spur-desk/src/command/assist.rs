use spur_core::{CharacterId, Cost, InvestigationAssistant, InvestigationId};

use super::Command;
use crate::desk::Desk;
use crate::display;
use crate::error::{DeskError, DeskResult};
use crate::notify::Notifier;

impl<N: Notifier> Desk<N> {
    /// The caller, or the retainer of theirs named in `retainer`.
    fn helper_for(&self, ch: CharacterId, retainer: Option<&str>) -> DeskResult<CharacterId> {
        let Some(needle) = retainer.map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(ch);
        };
        let owned = |c: &&spur_core::Character| !c.is_player() && c.discovery_recipient() == ch;
        let found = self.store.find_character(needle).filter(owned).or_else(|| {
            let mut by_id = self
                .store
                .characters()
                .into_iter()
                .filter(|c| owned(c) && c.id.matches_prefix(needle));
            match (by_id.next(), by_id.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        });
        let retainer =
            found.ok_or_else(|| DeskError::invalid("Retainer not found by that name or number."))?;
        if retainer.assistant_level() < 1 {
            return Err(DeskError::state(format!(
                "{} is not able to assist investigations.",
                retainer.name
            )));
        }
        Ok(retainer.id)
    }

    /// Ongoing investigations `helper` may join on `ch`'s say-so.
    ///
    /// Anyone may join where they hold an invitation. A retainer may also
    /// join anything its owner runs or helps with.
    fn joinable(&self, ch: CharacterId, helper: CharacterId) -> Vec<InvestigationId> {
        self.store
            .investigations()
            .into_iter()
            .filter(|inv| inv.ongoing)
            .filter(|inv| {
                inv.assistant(helper).is_some()
                    || (helper != ch
                        && (inv.character == ch
                            || inv.assistant(ch).is_some_and(|a| a.currently_helping)))
            })
            .map(|inv| inv.id)
            .collect()
    }

    /// Mark `helper` as helping, paying the activation cost and rerolling.
    fn start_helping(
        &mut self,
        ch: CharacterId,
        helper: CharacterId,
        id: InvestigationId,
    ) -> DeskResult<()> {
        let cost = Cost::action_points(self.costs(ch)?.active_ap);
        self.store
            .character_mut(ch)?
            .pay(&cost)
            .map_err(|_| DeskError::insufficient("You cannot afford to do that action."))?;
        let inv = self.store.investigation_mut(id)?;
        match inv.assistant_mut(helper) {
            Some(record) => record.currently_helping = true,
            None => {
                let mut record = InvestigationAssistant::new(helper);
                record.currently_helping = true;
                self.store.add_assistant(id, record)?;
            }
        }
        self.roll(id, 0, None)?;
        tracing::info!(investigation = %id, helper = %helper, "assistant joined");
        Ok(())
    }

    fn busy_helping(&self, helper: CharacterId) -> DeskResult<()> {
        let helping = self.store.helping(helper);
        if helping.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = helping.iter().map(ToString::to_string).collect();
        Err(DeskError::state(format!(
            "{} is already helping an investigation: {}",
            display::helper_name(&self.store, helper),
            ids.join(", ")
        )))
    }

    fn not_while_investigating(&self, ch: CharacterId, helper: CharacterId) -> DeskResult<()> {
        if helper == ch && self.store.active_investigation(ch).is_some() {
            return Err(DeskError::state(
                "You cannot assist an investigation while having an active investigation.",
            ));
        }
        Ok(())
    }

    pub(crate) fn do_assist(&mut self, ch: CharacterId, cmd: &Command<'_>) -> DeskResult<String> {
        if cmd.lhs.is_empty() {
            return Ok(self.assist_overview(ch));
        }
        let id = self.find_investigation(cmd.lhs)?;
        let helper = self.helper_for(ch, cmd.rhs)?;
        let inv = self.store.investigation(id)?;
        if helper == ch && inv.character == ch {
            return Err(DeskError::invalid("You cannot assist your own investigation."));
        }
        self.not_while_investigating(ch, helper)?;
        if !self.joinable(ch, helper).contains(&id) {
            return Err(DeskError::invalid("No investigation by that ID."));
        }
        self.busy_helping(helper)?;
        self.start_helping(ch, helper, id)?;
        Ok(format!(
            "{} is now helping {}.",
            display::helper_name(&self.store, helper),
            self.store.investigation(id)?
        ))
    }

    fn assist_overview(&self, ch: CharacterId) -> String {
        let mut out = String::from("You are permitted to help the following investigations:");
        for inv in self.store.investigations() {
            let invited = inv
                .assistant(ch)
                .is_some_and(|a| !a.currently_helping);
            if inv.ongoing && inv.active && invited {
                out.push_str(&format!("\n  {inv} (ID: {})", inv.id));
            }
        }
        let mut helpers = vec![ch];
        helpers.extend(
            self.store
                .characters()
                .into_iter()
                .filter(|c| !c.is_player() && c.discovery_recipient() == ch)
                .map(|c| c.id),
        );
        let mut helping = Vec::new();
        for helper in helpers {
            for id in self.store.helping(helper) {
                helping.push(format!(
                    "\n  {} is helping {id}",
                    display::helper_name(&self.store, helper)
                ));
            }
        }
        if !helping.is_empty() {
            out.push_str("\nCurrently helping:");
            out.push_str(&helping.concat());
        }
        out
    }

    pub(crate) fn do_assist_stop(&mut self, ch: CharacterId, cmd: &Command<'_>) -> DeskResult<String> {
        let helper = self.helper_for(ch, cmd.rhs)?;
        let only = match cmd.lhs {
            "" => None,
            needle => Some(self.find_investigation(needle)?),
        };
        let stopping: Vec<InvestigationId> = self
            .store
            .helping(helper)
            .into_iter()
            .filter(|id| only.is_none_or(|only| only == *id))
            .collect();
        let name = display::helper_name(&self.store, helper);
        if stopping.is_empty() {
            return Err(DeskError::state(format!(
                "{name} is not helping an investigation."
            )));
        }
        let refund = Cost::action_points(self.costs(ch)?.active_ap);
        for id in &stopping {
            if let Some(record) = self.store.investigation_mut(*id)?.assistant_mut(helper) {
                record.currently_helping = false;
            }
            self.store.character_mut(ch)?.refund(&refund);
        }
        Ok(format!("{name} stopped assisting investigations."))
    }

    pub(crate) fn do_assist_resume(
        &mut self,
        ch: CharacterId,
        cmd: &Command<'_>,
    ) -> DeskResult<String> {
        let id = self.find_investigation(cmd.lhs)?;
        let helper = self.helper_for(ch, cmd.rhs)?;
        if helper == ch && self.store.active_investigation(ch).is_some() {
            return Err(DeskError::state(
                "You currently have an active investigation, and cannot assist an investigation.",
            ));
        }
        if !self.store.helping(helper).is_empty() {
            return Err(DeskError::state(format!(
                "{} is already assisting an investigation.",
                display::helper_name(&self.store, helper)
            )));
        }
        let inv = self.store.investigation(id)?;
        if !inv.ongoing || inv.assistant(helper).is_none() {
            return Err(DeskError::invalid(
                "Not helping an investigation by that number.",
            ));
        }
        self.start_helping(ch, helper, id)?;
        Ok(format!("Now helping {}.", self.store.investigation(id)?))
    }
}
