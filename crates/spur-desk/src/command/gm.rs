use spur_core::{Clue, ClueId, InvestigationId, LoreError, LoreStore};

use super::{Command, CommandKind};
use crate::desk::Desk;
use crate::display;
use crate::error::{DeskError, DeskResult};
use crate::notify::Notifier;

const NOT_NUMBERS: &str = "Arguments must be numbers.";

fn find_clue(store: &LoreStore, needle: &str) -> DeskResult<ClueId> {
    store.resolve_clue(needle).map_err(|e| match e {
        LoreError::NoMatch(_) => DeskError::invalid("No clue by that ID."),
        other => other.into(),
    })
}

/// Whether `word` appears in the clue, its tags, or any revelation it feeds.
fn clue_mentions(store: &LoreStore, clue: &Clue, word: &str) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(word);
    if hit(&clue.name) || hit(&clue.desc) {
        return true;
    }
    if store.tag_names(&clue.search_tags).iter().any(|t| hit(t)) {
        return true;
    }
    store
        .revelations_for_clue(clue.id)
        .into_iter()
        .filter_map(|id| store.get_revelation(id))
        .any(|rev| {
            hit(&rev.name)
                || hit(&rev.desc)
                || store.tag_names(&rev.search_tags).iter().any(|t| hit(t))
        })
}

impl<N: Notifier> Desk<N> {
    pub(crate) fn do_gm(&mut self, cmd: &Command<'_>) -> DeskResult<String> {
        match cmd.kind {
            CommandKind::GmList if cmd.lhs.is_empty() => self.gm_list(),
            CommandKind::GmList | CommandKind::GmView => {
                let id = self.find_investigation(cmd.lhs)?;
                self.gm_view(id)
            }
            CommandKind::GmTarget => self.gm_target(cmd),
            CommandKind::GmRandomTarget => {
                let id = self.find_investigation(cmd.lhs)?;
                self.set_target(id, None)?;
                let target = self.targeted_clue(id)?;
                let name = target
                    .and_then(|c| self.store.get_clue(c))
                    .map_or("None", |c| c.name.as_str());
                Ok(format!("{} now targets {name}", self.store.investigation(id)?))
            }
            CommandKind::GmRoll => self.gm_roll(cmd),
            CommandKind::GmResult => {
                let id = self.find_investigation(cmd.lhs)?;
                let text = cmd.require_rhs("gminvest/result <id>=<text>")?;
                let inv = self.store.investigation_mut(id)?;
                inv.results = text.to_string();
                inv.automate_result = false;
                Ok(format!("Result is now:\n{text}"))
            }
            CommandKind::GmSetProgress => {
                let id = self.find_investigation(cmd.lhs)?;
                let progress: i32 = cmd
                    .require_rhs("gminvest/setprogress <id>=<progress>")?
                    .parse()
                    .map_err(|_| DeskError::invalid(NOT_NUMBERS))?;
                let inv = self.store.investigation_mut(id)?;
                inv.progress = progress;
                Ok(format!(
                    "Their progress is now {}, required to complete is {}.",
                    inv.progress, inv.completion_value
                ))
            }
            CommandKind::GmGrant => self.gm_grant(cmd),
            CommandKind::GmSearch => self.gm_search(cmd),
            _ => Err(DeskError::UnknownCommand(cmd.args.to_string())),
        }
    }

    fn gm_list(&mut self) -> DeskResult<String> {
        let ids: Vec<InvestigationId> = self
            .store
            .investigations()
            .into_iter()
            .filter(|inv| inv.active && inv.ongoing)
            .map(|inv| inv.id)
            .collect();
        let mut out = format!(
            "{:<10}{:<16}{:<24}{:<24}Roll",
            "ID", "Char", "Topic", "Targeted Clue"
        );
        for id in ids {
            let roll = self.get_roll(id)?;
            let target = self.targeted_clue(id)?;
            let inv = self.store.investigation(id)?;
            let target = target
                .and_then(|c| self.store.get_clue(c))
                .map_or("None", |c| c.name.as_str());
            let topic: String = inv.topic.chars().take(22).collect();
            let target: String = target.chars().take(22).collect();
            out.push_str(&format!(
                "\n{:<10}{:<16}{:<24}{:<24}{roll}",
                inv.id.to_string(),
                self.store.character_name(inv.character),
                topic,
                target
            ));
        }
        Ok(out)
    }

    fn gm_view(&mut self, id: InvestigationId) -> DeskResult<String> {
        let succeeds = self.check_success(id, 0, None)?;
        let diff = self.difficulty(id)?;
        Ok(display::gm_investigation(
            &self.store,
            self.store.investigation(id)?,
            diff,
            succeeds,
        ))
    }

    fn gm_target(&mut self, cmd: &Command<'_>) -> DeskResult<String> {
        let id = self.find_investigation(cmd.lhs)?;
        let clue = find_clue(&self.store, cmd.require_rhs("gminvest/target <id>=<clue>")?)?;
        let owner = self.store.investigation(id)?.character;
        if self.store.knows_clue(owner, clue) {
            return Err(DeskError::state("They already have that clue. Aborting."));
        }
        self.set_target(id, Some(clue))?;
        Ok(format!(
            "{} set to {}.",
            self.store.investigation(id)?,
            self.store.clue(clue)?.name
        ))
    }

    fn gm_roll(&mut self, cmd: &Command<'_>) -> DeskResult<String> {
        let id = self.find_investigation(cmd.lhs)?;
        let numbers = cmd
            .rhs_list()
            .into_iter()
            .map(str::parse::<i32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| DeskError::invalid(NOT_NUMBERS))?;
        let modifier = numbers.first().copied().unwrap_or(0);
        let diff = numbers.get(1).copied();
        let roll = self.roll(id, modifier, diff)?;
        let verb = if self.check_success(id, 0, None)? {
            "succeed"
        } else {
            "fail"
        };
        Ok(format!(
            "Recording their new roll as: {roll}.\n\
             They will {verb} the check to discover a clue this week."
        ))
    }

    fn gm_grant(&mut self, cmd: &Command<'_>) -> DeskResult<String> {
        let rhs = cmd.require_rhs("gminvest/grant <character>=<clue>")?;
        let ch = self
            .store
            .find_character(cmd.lhs)
            .map(|c| c.id)
            .ok_or_else(|| DeskError::invalid(format!("No character named {}.", cmd.lhs)))?;
        let clue = find_clue(&self.store, rhs)?;
        let unlocked = self.grant(ch, clue)?;
        let mut out = format!(
            "{} now knows {}.",
            self.store.character_name(ch),
            self.store.clue(clue)?.name
        );
        for rev in unlocked.iter().filter_map(|r| self.store.get_revelation(*r)) {
            out.push_str(&format!("\nThey had a revelation: {}", rev.name));
        }
        Ok(out)
    }

    fn gm_search(&self, cmd: &Command<'_>) -> DeskResult<String> {
        let word = cmd
            .require_rhs("gminvest/search <character>=<keyword>")?
            .to_lowercase();
        let ch = self
            .store
            .find_character(cmd.lhs)
            .map(|c| c.id)
            .ok_or_else(|| DeskError::invalid(format!("No character named {}.", cmd.lhs)))?;
        let matches: Vec<String> = self
            .store
            .query()
            .investigable()
            .unknown_to(ch)
            .execute()
            .into_iter()
            .filter(|clue| clue_mentions(&self.store, clue, &word))
            .map(|clue| format!("(ID:{}, {})", clue.id, clue.name))
            .collect();
        Ok(format!("Clues that match: {}", matches.join(", ")))
    }
}
