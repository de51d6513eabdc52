use spur_core::{
    CharacterId, Cost, Investigation, InvestigationAssistant, InvestigationId, ResourceKind,
};
use spur_mechanics::{is_valid_skill, is_valid_stat};

use super::{Command, parse_amount};
use crate::desk::Desk;
use crate::display;
use crate::error::{DeskError, DeskResult};
use crate::form::InvestigationForm;
use crate::notify::{INVESTIGATIONS, Notifier};
use crate::target::{TopicSearch, find_target, pick_clue, placeholder_clue};

const ONE_ACTIVE: &str = "You may only have one active investigation per week, and cannot change \
                          it once it has received GM attention. Only the active investigation can \
                          progress.";
const NO_FORM: &str = "You need to create a form first with /new.";
const CANNOT_AFFORD: &str = "You cannot afford to do that action.";

fn no_form() -> DeskError {
    DeskError::state(NO_FORM)
}

fn committed_mut(inv: &mut Investigation, kind: ResourceKind) -> &mut u32 {
    match kind {
        ResourceKind::Economic => &mut inv.economic,
        ResourceKind::Military => &mut inv.military,
        ResourceKind::Social => &mut inv.social,
    }
}

fn table(invs: &[&Investigation], show_active: bool) -> String {
    let mut out = format!("{:<10}{:<40}", "ID", "Tag/Topic");
    if show_active {
        out.push_str("Active");
    }
    for inv in invs {
        out.push_str(&format!("\n{:<10}{:<40}", inv.id.to_string(), inv.topic));
        if show_active && inv.active {
            out.push('X');
        }
    }
    out.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
}

impl<N: Notifier> Desk<N> {
    /// An investigation the character owns.
    fn own_investigation(&self, ch: CharacterId, needle: &str) -> DeskResult<InvestigationId> {
        let id = self.find_investigation(needle)?;
        if self.store.investigation(id)?.character != ch {
            return Err(DeskError::invalid("Investigation not found."));
        }
        Ok(id)
    }

    pub(crate) fn do_investigate(&mut self, ch: CharacterId, cmd: &Command<'_>) -> DeskResult<String> {
        if !cmd.lhs.is_empty() {
            return self.do_view(ch, cmd.lhs);
        }
        let mut out = String::new();
        if let Some(form) = self.forms.get(&ch) {
            out.push_str(&form.display(&self.store));
            out.push('\n');
        }
        let ongoing: Vec<&Investigation> = self
            .store
            .investigations_of(ch)
            .into_iter()
            .filter(|inv| inv.ongoing)
            .collect();
        out.push_str(&format!("Ongoing investigations:\n{}", table(&ongoing, true)));
        Ok(out)
    }

    pub(crate) fn do_history(&mut self, ch: CharacterId) -> DeskResult<String> {
        let old: Vec<&Investigation> = self
            .store
            .investigations_of(ch)
            .into_iter()
            .filter(|inv| !inv.ongoing)
            .collect();
        Ok(format!("Old investigations:\n{}", table(&old, false)))
    }

    // -----------------------------------------------------------------------
    // Creation form
    // -----------------------------------------------------------------------

    pub(crate) fn do_new(&mut self, ch: CharacterId) -> DeskResult<String> {
        let form = self.forms.entry(ch).insert_entry(InvestigationForm::new());
        Ok(form.get().display(&self.store))
    }

    pub(crate) fn do_topic(&mut self, ch: CharacterId, args: &str) -> DeskResult<String> {
        if !self.forms.contains_key(&ch) {
            return Err(no_form());
        }
        let search = TopicSearch::parse(&self.store, ch, args)?;
        let candidate = pick_clue(&self.store, ch, &search, &mut self.rng);
        let mut out = String::new();
        if candidate.is_none() {
            if search.tag_count() > self.config.max_topic_tags {
                return Err(DeskError::invalid(
                    "That investigation would be too specific. Try different tags or abort.",
                ));
            }
            out.push_str(
                "The tag(s) or clue specified does not match an existing clue, and will be much \
                 more difficult and more expensive to look into than normal. Try other tags for \
                 an easier investigation, or proceed to /finish for a much more difficult one.\n",
            );
        }
        let form = self.forms.get_mut(&ch).ok_or_else(no_form)?;
        form.set_topic(args, search, candidate);
        out.push_str(&form.display(&self.store));
        Ok(out)
    }

    pub(crate) fn do_story(&mut self, ch: CharacterId, args: &str) -> DeskResult<String> {
        let form = self.forms.get_mut(&ch).ok_or_else(no_form)?;
        form.set_story(args);
        Ok(form.display(&self.store))
    }

    pub(crate) fn do_stat(&mut self, ch: CharacterId, args: &str) -> DeskResult<String> {
        let form = self.forms.get_mut(&ch).ok_or_else(no_form)?;
        form.set_stat(args)?;
        Ok(form.display(&self.store))
    }

    pub(crate) fn do_skill(&mut self, ch: CharacterId, args: &str) -> DeskResult<String> {
        let form = self.forms.get_mut(&ch).ok_or_else(no_form)?;
        form.set_skill(args)?;
        Ok(form.display(&self.store))
    }

    pub(crate) fn do_cancel(&mut self, ch: CharacterId) -> DeskResult<String> {
        self.forms.remove(&ch).ok_or_else(no_form)?;
        Ok("Investigation creation cancelled.".to_string())
    }

    pub(crate) fn do_finish(&mut self, ch: CharacterId) -> DeskResult<String> {
        let costs = self.costs(ch)?;
        let new_clue_ap = self.settings.new_clue_ap_cost();
        let form = self.forms.get_mut(&ch).ok_or_else(no_form)?;
        let search = form.check_complete()?.clone();
        if self.store.character(ch)?.social < costs.start_social {
            return Err(DeskError::insufficient(format!(
                "It costs {} social resources to start a new investigation.",
                costs.start_social
            )));
        }
        let new_clue = form.needs_new_clue();
        if new_clue {
            if !form.confirm_new_clue() {
                return Ok(format!(
                    "An opportunity has arisen to pursue knowledge previously unseen by mortal \
                     eyes. It will require a great deal of energy ({new_clue_ap} action points) \
                     to investigate. Your tag requirements: {}\nRepeat the command to confirm \
                     and continue.",
                    search.describe(&self.store)
                ));
            }
            self.store
                .character_mut(ch)?
                .pay(&Cost::action_points(new_clue_ap))
                .map_err(|_| {
                    DeskError::insufficient(
                        "You're too busy for such an investigation. (low AP) Try different \
                         tags or abort.",
                    )
                })?;
        }
        self.store
            .character_mut(ch)?
            .pay(&Cost::resource(ResourceKind::Social, costs.start_social))?;
        let form = self.forms.remove(&ch).ok_or_else(no_form)?;
        let mut out = format!(
            "You spend {} social resources to start a new investigation.\n",
            costs.start_social
        );

        let mut inv = Investigation::new(ch, form.topic.clone());
        inv.actions = form.story.clone();
        if let Some(stat) = form.stat.clone() {
            inv.stat_used = stat;
        }
        if let Some(skill) = form.skill.clone() {
            inv.skill_used = skill;
        }
        let id = self.store.add_investigation(inv)?;
        if new_clue {
            let clue = placeholder_clue(&self.store, &search, self.store.investigation(id)?);
            let name = clue.name.clone();
            let clue_id = self.store.add_clue(clue)?;
            self.set_target(id, Some(clue_id))?;
            self.notifier.alert_staff(
                &format!(
                    "{} needs a new clue written for their investigation on {}: {name}",
                    self.store.character_name(ch),
                    form.topic
                ),
                INVESTIGATIONS,
            );
        } else {
            // The candidate was picked at /topic and may have been learned since.
            let target = match form.candidate {
                Some(clue)
                    if self.store.get_clue(clue).is_some()
                        && !self.store.knows_clue(ch, clue) =>
                {
                    Some(clue)
                }
                _ => find_target(&self.store, self.store.investigation(id)?, &mut self.rng),
            };
            self.set_target(id, target)?;
        }

        let other_active = self.store.active_investigation(ch).is_some();
        let helping = !self.store.helping(ch).is_empty();
        if other_active {
            out.push_str(
                "New investigation created. You already are participating in an active \
                 investigation for this week, but may still add resources/silver to increase \
                 its chance of success for when you next mark this as active.",
            );
        } else if helping {
            out.push_str(
                "New investigation created. This investigation is not active because you are \
                 currently assisting an investigation already.",
            );
        } else if self
            .store
            .character_mut(ch)?
            .pay(&Cost::action_points(costs.active_ap))
            .is_ok()
        {
            self.store.investigation_mut(id)?.active = true;
            out.push_str(
                "New investigation created. This has been set as your active investigation for \
                 the week, and you may add resources/silver to increase its chance of success.",
            );
        } else {
            out.push_str(
                "New investigation created. You could not afford the action points to mark it \
                 active.",
            );
        }
        out.push('\n');
        out.push_str(ONE_ACTIVE);

        let inv = self.store.investigation(id)?;
        let mut staff = format!(
            "{} has started an investigation on {}.",
            self.store.character_name(ch),
            inv.topic
        );
        match inv.clue_target.and_then(|c| self.store.get_clue(c)) {
            Some(clue) => staff.push_str(&format!(" They will roll to find clue {}.", clue.name)),
            None => staff.push_str(
                " Their topic does not target a clue, and will automatically fail unless GM'd.",
            ),
        }
        self.notifier.alert_staff(&staff, INVESTIGATIONS);
        tracing::info!(investigation = %id, character = %ch, new_clue, "investigation started");
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Existing investigations
    // -----------------------------------------------------------------------

    pub(crate) fn do_view(&mut self, ch: CharacterId, lhs: &str) -> DeskResult<String> {
        let id = self.own_investigation(ch, lhs)?;
        let diff = self.difficulty(id)?;
        Ok(display::investigation(
            &self.store,
            self.store.investigation(id)?,
            diff,
        ))
    }

    pub(crate) fn do_active(&mut self, ch: CharacterId, lhs: &str) -> DeskResult<String> {
        let id = self.own_investigation(ch, lhs)?;
        let inv = self.store.investigation(id)?;
        if inv.active {
            return Err(DeskError::state("It is already active."));
        }
        if !inv.ongoing {
            return Err(DeskError::state("That investigation is finished."));
        }
        if !self.store.helping(ch).is_empty() {
            return Err(DeskError::state(
                "You are currently helping an investigation, and must stop first.",
            ));
        }
        let current = self
            .store
            .active_investigation(ch)
            .map(|inv| (inv.id, inv.automate_result));
        if let Some((_, false)) = current {
            return Err(DeskError::state(
                "You already have an active investigation that has received GMing this week, \
                 and cannot be switched.",
            ));
        }
        let cost = Cost::action_points(self.costs(ch)?.active_ap);
        self.store
            .character_mut(ch)?
            .pay(&cost)
            .map_err(|_| DeskError::insufficient(CANNOT_AFFORD))?;
        let mut out = String::new();
        if let Some((previous, _)) = current {
            self.store.investigation_mut(previous)?.active = false;
            self.store.character_mut(ch)?.refund(&cost);
            out.push_str(&format!("{previous} is no longer active.\n"));
        }
        self.store.investigation_mut(id)?.active = true;
        out.push_str(&format!("{} set to active.", self.store.investigation(id)?));
        Ok(out)
    }

    pub(crate) fn do_silver(&mut self, ch: CharacterId, cmd: &Command<'_>) -> DeskResult<String> {
        let id = self.own_investigation(ch, cmd.lhs)?;
        let rhs = cmd.require_rhs("investigate/silver <id>=<amount>")?;
        const BAD: &str = "You must specify a positive amount that is less than your money on hand.";
        let val: u64 = parse_amount(rhs, BAD)?;
        if val > self.store.character(ch)?.silver {
            return Err(DeskError::insufficient(BAD));
        }
        let current = self.store.investigation(id)?.silver;
        if val % self.config.silver_step != 0 || current.saturating_add(val) > self.config.max_silver
        {
            return Err(DeskError::invalid(format!(
                "Silver must be a multiple of {}, {} max.\nCurrent silver: {current}",
                self.config.silver_step, self.config.max_silver
            )));
        }
        self.store.character_mut(ch)?.pay(&Cost::silver(val))?;
        self.store.investigation_mut(id)?.silver = current + val;
        self.roll(id, 0, None)?;
        Ok(format!("You add {val} silver to the investigation."))
    }

    pub(crate) fn do_resource(&mut self, ch: CharacterId, cmd: &Command<'_>) -> DeskResult<String> {
        let id = self.own_investigation(ch, cmd.lhs)?;
        let invalid = || DeskError::invalid("Invalid syntax.");
        let list = cmd.rhs_list();
        let [kind, amount] = list.as_slice() else {
            return Err(invalid());
        };
        let kind = ResourceKind::parse(kind).ok_or_else(invalid)?;
        let val: u32 = parse_amount(amount, "Invalid syntax.")?;
        let current = *committed_mut(self.store.investigation_mut(id)?, kind);
        if current.saturating_add(val) > self.config.max_resource {
            return Err(DeskError::invalid(format!(
                "Maximum of {} per resource. Current value: {current}",
                self.config.max_resource
            )));
        }
        self.store
            .character_mut(ch)?
            .pay(&Cost::resource(kind, val))
            .map_err(|_| {
                DeskError::insufficient(format!("You do not have enough {kind} resources."))
            })?;
        *committed_mut(self.store.investigation_mut(id)?, kind) = current + val;
        self.roll(id, 0, None)?;
        Ok(format!("You have added {val} resources to the investigation."))
    }

    pub(crate) fn do_action_points(
        &mut self,
        ch: CharacterId,
        cmd: &Command<'_>,
    ) -> DeskResult<String> {
        let id = self.own_investigation(ch, cmd.lhs)?;
        let inv = self.store.investigation(id)?;
        if !inv.active {
            return Err(DeskError::state(
                "The investigation must be marked active to invest AP in it.",
            ));
        }
        let current = inv.action_points;
        let rhs = cmd.require_rhs("investigate/actionpoints <id>=<amount>")?;
        let val: u32 = parse_amount(rhs, "You must specify a positive amount that you can afford.")?;
        if val % self.config.ap_step != 0 {
            return Err(DeskError::invalid(format!(
                "Action points must be a multiple of {}\nCurrent action points allocated: {current}",
                self.config.ap_step
            )));
        }
        self.store
            .character_mut(ch)?
            .pay(&Cost::action_points(val))
            .map_err(|_| DeskError::insufficient(CANNOT_AFFORD))?;
        self.store.investigation_mut(id)?.action_points = current + val;
        self.roll(id, 0, None)?;
        Ok(format!("You add {val} action points to the investigation."))
    }

    pub(crate) fn do_pause(&mut self, ch: CharacterId, lhs: &str) -> DeskResult<String> {
        let id = self.own_investigation(ch, lhs)?;
        if !self.store.investigation(id)?.active {
            return Err(DeskError::state("It was already inactive."));
        }
        let refund = Cost::action_points(self.costs(ch)?.active_ap);
        self.store.character_mut(ch)?.refund(&refund);
        self.store.investigation_mut(id)?.active = false;
        Ok("Investigation is no longer active.".to_string())
    }

    pub(crate) fn do_abandon(&mut self, ch: CharacterId, lhs: &str) -> DeskResult<String> {
        let id = self.own_investigation(ch, lhs)?;
        let refund = Cost::action_points(self.costs(ch)?.active_ap);
        let inv = self.store.investigation_mut(id)?;
        let was_active = inv.active;
        inv.ongoing = false;
        inv.active = false;
        let mut stopped = Vec::new();
        for helper in inv.assistants.iter_mut().filter(|a| a.currently_helping) {
            helper.currently_helping = false;
            stopped.push(helper.character);
        }
        if was_active {
            self.store.character_mut(ch)?.refund(&refund);
        }
        let mut out = String::from(
            "Investigation has been marked to no longer be ongoing nor active.\n\
             You can resume it later with /resume.",
        );
        if !stopped.is_empty() {
            let names: Vec<String> = stopped
                .iter()
                .map(|c| display::helper_name(&self.store, *c))
                .collect();
            out.push_str(&format!(
                "\nThe following assistants have stopped helping: {}",
                names.join(", ")
            ));
        }
        Ok(out)
    }

    pub(crate) fn do_resume(&mut self, ch: CharacterId, lhs: &str) -> DeskResult<String> {
        let id = self.own_investigation(ch, lhs)?;
        const HOW: &str = "To mark an investigation as active, use /active.";
        if self.store.investigation(id)?.ongoing {
            return Err(DeskError::state(format!("Already ongoing. {HOW}")));
        }
        let found = self
            .store
            .clue_discoveries_of(ch)
            .iter()
            .any(|d| d.investigation == Some(id));
        if found {
            return Err(DeskError::state(
                "This investigation has found something already. Start another.",
            ));
        }
        self.store.investigation_mut(id)?.ongoing = true;
        Ok(format!("Investigation has been marked to be ongoing. {HOW}"))
    }

    pub(crate) fn do_change_story(
        &mut self,
        ch: CharacterId,
        cmd: &Command<'_>,
    ) -> DeskResult<String> {
        let id = self.own_investigation(ch, cmd.lhs)?;
        let rhs = cmd.require_rhs("investigate/changestory <id>=<story>")?;
        self.store.investigation_mut(id)?.actions = rhs.to_string();
        Ok(format!("The new story of your investigation is:\n{rhs}"))
    }

    pub(crate) fn do_change_stat(&mut self, ch: CharacterId, cmd: &Command<'_>) -> DeskResult<String> {
        let id = self.own_investigation(ch, cmd.lhs)?;
        let rhs = cmd.require_rhs("investigate/changestat <id>=<stat>")?;
        if !is_valid_stat(rhs) {
            return Err(DeskError::invalid("That is not a valid stat name."));
        }
        let stat = rhs.to_lowercase();
        self.store.investigation_mut(id)?.stat_used = stat.clone();
        Ok(format!("The new stat is: {stat}"))
    }

    pub(crate) fn do_change_skill(
        &mut self,
        ch: CharacterId,
        cmd: &Command<'_>,
    ) -> DeskResult<String> {
        let id = self.own_investigation(ch, cmd.lhs)?;
        let rhs = cmd.require_rhs("investigate/changeskill <id>=<skill>")?;
        if !is_valid_skill(rhs) {
            return Err(DeskError::invalid("That is not a valid skill name."));
        }
        let skill = rhs.to_lowercase();
        self.store.investigation_mut(id)?.skill_used = skill.clone();
        Ok(format!("The new skill is: {skill}"))
    }

    pub(crate) fn do_request_help(
        &mut self,
        ch: CharacterId,
        cmd: &Command<'_>,
    ) -> DeskResult<String> {
        let id = self.own_investigation(ch, cmd.lhs)?;
        let inv = self.store.investigation(id)?;
        if !(inv.active && inv.ongoing) {
            return Err(DeskError::state(
                "You may only invite others to active investigations.",
            ));
        }
        let names = cmd.rhs_list();
        if names.is_empty() {
            return Err(DeskError::invalid(
                "Usage: investigate/requesthelp <id>=<character>[,<character>...]",
            ));
        }
        let caller = self.store.character_name(ch).to_string();
        let actions = inv.actions.clone();
        let mut lines = Vec::new();
        for name in names {
            let Some(target) = self
                .store
                .find_character(name)
                .filter(|c| c.is_player())
                .map(|c| c.id)
            else {
                lines.push(format!("No active player found named {name}"));
                continue;
            };
            if target == ch {
                lines.push("You cannot invite yourself.".to_string());
                continue;
            }
            if self.store.investigation(id)?.assistant(target).is_some() {
                lines.push(format!("{name} is already able to assist the investigation."));
                continue;
            }
            self.store
                .add_assistant(id, InvestigationAssistant::new(target))?;
            self.notifier.notify(
                target,
                &format!(
                    "{caller} has requested your help in their investigation, ID {id}.\n\
                     To assist them, use assist {id}.\n\
                     The current actions of their investigation are: {actions}"
                ),
                &format!("Investigation Request From {caller}"),
            );
            lines.push(format!("Asking {} to assist with {id}.", self.store.character_name(target)));
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::{Table, table as world};
    use crate::notify::Recipient;
    use crate::target::PLACEHOLDER_RATING;
    use spur_core::DiscoveryMethod;

    fn started(t: &mut Table) -> String {
        t.desk.process(t.mira, "investigate/new").unwrap();
        t.desk.process(t.mira, "investigate/topic rats").unwrap();
        t.desk
            .process(t.mira, "investigate/story I follow the squeaking.")
            .unwrap();
        t.desk.process(t.mira, "investigate/finish").unwrap()
    }

    #[test]
    fn form_fields_show_in_the_draft() {
        let mut t = world();
        let out = t.desk.process(t.mira, "investigate/new").unwrap();
        assert!(out.starts_with("Creating an investigation:"));
        let out = t.desk.process(t.mira, "investigate/topic rats/-sewers").unwrap();
        assert!(out.contains("does not match an existing clue"));
        assert!(out.contains("Creating an investigation: rats; -sewers"));
        let out = t.desk.process(t.mira, "investigate/stat Wits").unwrap();
        assert!(out.contains("Stat: wits - Skill: ???"));
        let err = t.desk.process(t.mira, "investigate/skill basketweaving").unwrap_err();
        assert_eq!(err.to_string(), "No skill by the name of basketweaving.");
        let out = t.desk.process(t.mira, "investigate/cancel").unwrap();
        assert_eq!(out, "Investigation creation cancelled.");
        assert!(t.desk.form(t.mira).is_none());
    }

    #[test]
    fn form_needed_first() {
        let mut t = world();
        let err = t.desk.process(t.mira, "investigate/story hi").unwrap_err();
        assert_eq!(err.to_string(), "You need to create a form first with /new.");
    }

    #[test]
    fn finish_requires_topic_then_story() {
        let mut t = world();
        t.desk.process(t.mira, "investigate/new").unwrap();
        let err = t.desk.process(t.mira, "investigate/finish").unwrap_err();
        assert_eq!(err.to_string(), "You must have topic defined.");
        t.desk.process(t.mira, "investigate/topic rats").unwrap();
        let err = t.desk.process(t.mira, "investigate/finish").unwrap_err();
        assert_eq!(err.to_string(), "You must have a story defined.");
    }

    #[test]
    fn finish_repicks_a_candidate_learned_meanwhile() {
        let mut t = world();
        t.desk.process(t.mira, "investigate/new").unwrap();
        t.desk.process(t.mira, "investigate/topic sewers").unwrap();
        t.desk.process(t.mira, "investigate/story Down the drain.").unwrap();
        let candidate = t.desk.form(t.mira).unwrap().candidate.unwrap();
        let other = if candidate == t.nest { t.well } else { t.nest };
        t.desk.grant(t.mira, candidate).unwrap();
        t.desk.process(t.mira, "investigate/finish").unwrap();
        let inv = t.desk.store().active_investigation(t.mira).unwrap();
        assert_eq!(inv.clue_target, Some(other));
    }

    #[test]
    fn finish_creates_active_investigation() {
        let mut t = world();
        let out = started(&mut t);
        assert!(out.starts_with("You spend 15 social resources to start a new investigation."));
        assert!(out.contains("This has been set as your active investigation"));
        assert!(out.ends_with("Only the active investigation can progress."));

        let sheet = t.desk.store().character(t.mira).unwrap();
        assert_eq!(sheet.social, 35);
        assert_eq!(sheet.action_points, 60);
        let inv = t.desk.store().active_investigation(t.mira).unwrap();
        assert_eq!(inv.topic, "rats");
        assert_eq!(inv.actions, "I follow the squeaking.");
        assert_eq!(inv.clue_target, Some(t.nest));
        let staff = t.desk.notifier().staff();
        assert_eq!(
            staff[0].message,
            "Mira has started an investigation on rats. They will roll to find clue Rat Nest."
        );
        assert!(t.desk.form(t.mira).is_none());
    }

    #[test]
    fn second_investigation_is_not_active() {
        let mut t = world();
        started(&mut t);
        let out = started(&mut t);
        assert!(out.contains("You already are participating in an active investigation"));
        let actives = t
            .desk
            .store()
            .investigations_of(t.mira)
            .iter()
            .filter(|i| i.active)
            .count();
        assert_eq!(actives, 1);
    }

    #[test]
    fn placeholder_needs_confirmation_and_ap() {
        let mut t = world();
        t.desk.process(t.mira, "investigate/new").unwrap();
        t.desk.process(t.mira, "investigate/topic rats/-sewers").unwrap();
        t.desk.process(t.mira, "investigate/story Ask around.").unwrap();
        let prompt = t.desk.process(t.mira, "investigate/finish").unwrap();
        assert!(prompt.contains("(50 action points)"));
        assert!(prompt.contains("Your tag requirements: rats; -sewers"));
        assert!(prompt.ends_with("Repeat the command to confirm and continue."));
        assert!(t.desk.store().investigations_of(t.mira).is_empty());

        let out = t.desk.process(t.mira, "investigate/finish").unwrap();
        assert!(out.contains("This has been set as your active investigation"));
        let inv = t.desk.store().investigations_of(t.mira)[0];
        let clue = t.desk.store().clue(inv.clue_target.unwrap()).unwrap();
        assert!(clue.is_placeholder());
        assert_eq!(clue.rating, PLACEHOLDER_RATING);
        assert!(clue.gm_notes.contains("Exclude tags: -sewers"));
        // 50 for the new clue, 40 to mark it active
        assert_eq!(t.desk.store().character(t.mira).unwrap().action_points, 10);
        let staff = t.desk.notifier().staff();
        assert!(staff[0].message.contains("needs a new clue written"));
    }

    #[test]
    fn low_ap_refuses_placeholder_and_resets_confirmation() {
        let mut t = world();
        t.desk.store_mut().character_mut(t.mira).unwrap().action_points = 20;
        t.desk.process(t.mira, "investigate/new").unwrap();
        t.desk.process(t.mira, "investigate/topic rats/-sewers").unwrap();
        t.desk.process(t.mira, "investigate/story Ask around.").unwrap();
        t.desk.process(t.mira, "investigate/finish").unwrap();
        let err = t.desk.process(t.mira, "investigate/finish").unwrap_err();
        assert!(err.to_string().starts_with("You're too busy for such an investigation."));
        let again = t.desk.process(t.mira, "investigate/finish").unwrap();
        assert!(again.ends_with("Repeat the command to confirm and continue."));
        assert_eq!(t.desk.store().character(t.mira).unwrap().social, 50);
    }

    #[test]
    fn too_many_tags_is_too_specific() {
        let mut t = world();
        t.desk.config.max_topic_tags = 1;
        t.desk.process(t.mira, "investigate/new").unwrap();
        let err = t
            .desk
            .process(t.mira, "investigate/topic rats/-sewers")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "That investigation would be too specific. Try different tags or abort."
        );
    }

    #[test]
    fn not_enough_social_to_start() {
        let mut t = world();
        t.desk.store_mut().character_mut(t.mira).unwrap().social = 5;
        t.desk.process(t.mira, "investigate/new").unwrap();
        t.desk.process(t.mira, "investigate/topic rats").unwrap();
        t.desk.process(t.mira, "investigate/story x").unwrap();
        let err = t.desk.process(t.mira, "investigate/finish").unwrap_err();
        assert_eq!(
            err.to_string(),
            "It costs 15 social resources to start a new investigation."
        );
    }

    #[test]
    fn listing_and_viewing() {
        let mut t = world();
        started(&mut t);
        let id = t.desk.store().investigations_of(t.mira)[0].id;
        let out = t.desk.process(t.mira, "investigate").unwrap();
        assert!(out.starts_with("Ongoing investigations:\nID"));
        assert!(out.contains(&format!("{id}")));
        let out = t.desk.process(t.mira, &format!("investigate/view {id}")).unwrap();
        assert!(out.contains("Topic: rats"));
        assert!(out.contains("Stat used: perception"));
        let err = t.desk.process(t.tobin, &format!("investigate/view {id}")).unwrap_err();
        assert_eq!(err.to_string(), "Investigation not found.");
        let err = t.desk.process(t.mira, "investigate/view").unwrap_err();
        assert_eq!(err.to_string(), "Must give ID of investigation.");
    }

    #[test]
    fn committing_resources() {
        let mut t = world();
        started(&mut t);
        let id = t.desk.store().investigations_of(t.mira)[0].id;

        let out = t.desk.process(t.mira, &format!("investigate/silver {id}=10000")).unwrap();
        assert_eq!(out, "You add 10000 silver to the investigation.");
        let err = t.desk.process(t.mira, &format!("investigate/silver {id}=2500")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Silver must be a multiple of 5000, 50000 max.\nCurrent silver: 10000"
        );

        let out = t
            .desk
            .process(t.mira, &format!("investigate/resource {id}=econ,30"))
            .unwrap();
        assert_eq!(out, "You have added 30 resources to the investigation.");
        let err = t
            .desk
            .process(t.mira, &format!("investigate/resource {id}=economic,30"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Maximum of 50 per resource. Current value: 30");
        let err = t
            .desk
            .process(t.mira, &format!("investigate/resource {id}=gold"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid syntax.");

        let err = t
            .desk
            .process(t.mira, &format!("investigate/actionpoints {id}=7"))
            .unwrap_err();
        assert!(err.to_string().starts_with("Action points must be a multiple of 5"));
        t.desk
            .process(t.mira, &format!("investigate/actionpoints {id}=20"))
            .unwrap();

        let inv = t.desk.store().investigation(id).unwrap();
        assert_eq!(inv.silver, 10_000);
        assert_eq!(inv.economic, 30);
        assert_eq!(inv.action_points, 20);
        assert!(inv.roll_is_set());
        let sheet = t.desk.store().character(t.mira).unwrap();
        assert_eq!(sheet.silver, 90_000);
        assert_eq!(sheet.economic, 20);
        assert_eq!(sheet.action_points, 40);
    }

    #[test]
    fn action_points_need_an_active_investigation() {
        let mut t = world();
        started(&mut t);
        let id = t.desk.store().investigations_of(t.mira)[0].id;
        t.desk.process(t.mira, &format!("investigate/pause {id}")).unwrap();
        let err = t
            .desk
            .process(t.mira, &format!("investigate/actionpoints {id}=5"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The investigation must be marked active to invest AP in it."
        );
    }

    fn active_and_idle(t: &Table) -> (spur_core::InvestigationId, spur_core::InvestigationId) {
        let invs = t.desk.store().investigations_of(t.mira);
        let active = invs.iter().find(|i| i.active).unwrap().id;
        let idle = invs.iter().find(|i| !i.active).unwrap().id;
        (active, idle)
    }

    #[test]
    fn pause_refunds_and_active_swaps() {
        let mut t = world();
        started(&mut t);
        started(&mut t);
        let (active, idle) = active_and_idle(&t);
        let err = t
            .desk
            .process(t.mira, &format!("investigate/active {}", active))
            .unwrap_err();
        assert_eq!(err.to_string(), "It is already active.");

        let out = t
            .desk
            .process(t.mira, &format!("investigate/active {}", idle))
            .unwrap();
        assert!(out.contains(&format!("{} is no longer active.", active)));
        assert!(out.ends_with("set to active."));
        assert!(!t.desk.store().investigation(active).unwrap().active);
        assert!(t.desk.store().investigation(idle).unwrap().active);
        // two starts at 15 social, one activation at 40 AP; the swap is free
        assert_eq!(t.desk.store().character(t.mira).unwrap().action_points, 60);

        let out = t
            .desk
            .process(t.mira, &format!("investigate/pause {}", idle))
            .unwrap();
        assert_eq!(out, "Investigation is no longer active.");
        assert_eq!(t.desk.store().character(t.mira).unwrap().action_points, 100);
        let err = t
            .desk
            .process(t.mira, &format!("investigate/pause {}", idle))
            .unwrap_err();
        assert_eq!(err.to_string(), "It was already inactive.");
    }

    #[test]
    fn gm_touched_investigation_cannot_be_swapped() {
        let mut t = world();
        started(&mut t);
        started(&mut t);
        let (active, idle) = active_and_idle(&t);
        t.desk
            .store_mut()
            .investigation_mut(active)
            .unwrap()
            .automate_result = false;
        let err = t
            .desk
            .process(t.mira, &format!("investigate/active {}", idle))
            .unwrap_err();
        assert!(err.to_string().contains("has received GMing this week"));
    }

    #[test]
    fn abandon_and_resume() {
        let mut t = world();
        started(&mut t);
        let id = t.desk.store().investigations_of(t.mira)[0].id;
        t.desk
            .process(t.mira, &format!("investigate/requesthelp {id}=Tobin"))
            .unwrap();
        t.desk.process(t.tobin, &format!("assist {id}")).unwrap();

        let out = t
            .desk
            .process(t.mira, &format!("investigate/abandon {id}"))
            .unwrap();
        assert!(out.contains("no longer be ongoing nor active"));
        assert!(out.ends_with("The following assistants have stopped helping: Tobin"));
        let inv = t.desk.store().investigation(id).unwrap();
        assert!(!inv.ongoing);
        assert_eq!(inv.active_assistants().count(), 0);
        let history = t.desk.process(t.mira, "investigate/history").unwrap();
        assert!(history.contains("rats"));

        let out = t
            .desk
            .process(t.mira, &format!("investigate/resume {id}"))
            .unwrap();
        assert!(out.starts_with("Investigation has been marked to be ongoing."));
        let err = t
            .desk
            .process(t.mira, &format!("investigate/resume {id}"))
            .unwrap_err();
        assert!(err.to_string().starts_with("Already ongoing."));
    }

    #[test]
    fn finished_investigation_cannot_resume() {
        let mut t = world();
        started(&mut t);
        let id = t.desk.store().investigations_of(t.mira)[0].id;
        t.desk.store_mut().investigation_mut(id).unwrap().ongoing = false;
        let mut disco = spur_core::ClueDiscovery::new(t.nest, t.mira, DiscoveryMethod::Investigation);
        disco.investigation = Some(id);
        t.desk.mark_discovered(disco).unwrap();
        let err = t
            .desk
            .process(t.mira, &format!("investigate/resume {id}"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "This investigation has found something already. Start another."
        );
    }

    #[test]
    fn change_fields() {
        let mut t = world();
        started(&mut t);
        let id = t.desk.store().investigations_of(t.mira)[0].id;
        let out = t
            .desk
            .process(t.mira, &format!("investigate/changestory {id}=I set traps."))
            .unwrap();
        assert_eq!(out, "The new story of your investigation is:\nI set traps.");
        let out = t
            .desk
            .process(t.mira, &format!("investigate/changestat {id}=Intellect"))
            .unwrap();
        assert_eq!(out, "The new stat is: intellect");
        let err = t
            .desk
            .process(t.mira, &format!("investigate/changeskill {id}=knitting"))
            .unwrap_err();
        assert_eq!(err.to_string(), "That is not a valid skill name.");
        let inv = t.desk.store().investigation(id).unwrap();
        assert_eq!(inv.actions, "I set traps.");
        assert_eq!(inv.stat_used, "intellect");
    }

    #[test]
    fn request_help_invites_players_only() {
        let mut t = world();
        started(&mut t);
        let id = t.desk.store().investigations_of(t.mira)[0].id;
        let out = t
            .desk
            .process(t.mira, &format!("investigate/requesthelp {id}=Tobin,Pip,Mira,Nobody"))
            .unwrap();
        assert_eq!(
            out,
            format!(
                "Asking Tobin to assist with {id}.\nNo active player found named Pip\n\
                 You cannot invite yourself.\nNo active player found named Nobody"
            )
        );
        let note = &t.desk.notifier().for_character(t.tobin)[0];
        assert_eq!(note.recipient, Recipient::Character(t.tobin));
        assert_eq!(note.category, "Investigation Request From Mira");
        let again = t
            .desk
            .process(t.mira, &format!("investigate/requesthelp {id}=tobin"))
            .unwrap();
        assert_eq!(again, "tobin is already able to assist the investigation.");
    }
}
