use chrono::Utc;

use spur_core::{CharacterId, ClueDiscovery, ClueId, Cost, LoreStore, RevelationId};

use super::Command;
use crate::desk::Desk;
use crate::display;
use crate::error::{DeskError, DeskResult};
use crate::notify::{DISCOVERY, Notifier};

fn clue_table(store: &LoreStore, discoveries: &[&ClueDiscovery]) -> String {
    let mut out = format!("{:<10}{:<40}Type", "Clue #", "Subject");
    for disco in discoveries {
        let Some(clue) = store.get_clue(disco.clue) else {
            continue;
        };
        out.push_str(&format!(
            "\n{:<10}{:<40}{}",
            clue.id.to_string(),
            clue.name,
            clue.clue_type
        ));
    }
    out
}

impl<N: Notifier> Desk<N> {
    /// A clue the character knows, by name or ID prefix.
    fn known_clue(&self, ch: CharacterId, needle: &str) -> DeskResult<ClueId> {
        self.store
            .resolve_clue(needle)
            .ok()
            .filter(|id| self.store.knows_clue(ch, *id))
            .ok_or_else(|| DeskError::invalid(format!("No clue found by this ID: {needle}.")))
    }

    pub(crate) fn do_clues(&mut self, ch: CharacterId, lhs: &str) -> DeskResult<String> {
        if lhs.is_empty() {
            let all: Vec<&ClueDiscovery> = self.store.clue_discoveries_of(ch).iter().collect();
            return Ok(format!(
                "Discovered Clues\n{}",
                clue_table(&self.store, &all)
            ));
        }
        let clue = self.known_clue(ch, lhs)?;
        let disco = self
            .store
            .clue_discovery(ch, clue)
            .ok_or(spur_core::LoreError::ClueNotFound(clue))?;
        Ok(display::discovery(&self.store, disco, false))
    }

    pub(crate) fn do_clue_search(&mut self, ch: CharacterId, args: &str) -> DeskResult<String> {
        let word = args.trim().to_lowercase();
        if word.is_empty() {
            return Err(DeskError::invalid("Usage: clues/search <text>"));
        }
        let hits: Vec<&ClueDiscovery> = self
            .store
            .clue_discoveries_of(ch)
            .iter()
            .filter(|disco| {
                let Some(clue) = self.store.get_clue(disco.clue) else {
                    return false;
                };
                disco.message.to_lowercase().contains(&word)
                    || clue.name.to_lowercase().contains(&word)
                    || clue.desc.to_lowercase().contains(&word)
                    || self
                        .store
                        .tag_names(&clue.search_tags)
                        .iter()
                        .any(|t| t.to_lowercase() == word)
            })
            .collect();
        Ok(format!("Matching Clues\n{}", clue_table(&self.store, &hits)))
    }

    pub(crate) fn do_clue_share(&mut self, ch: CharacterId, cmd: &Command<'_>) -> DeskResult<String> {
        let mut problems = String::new();
        let mut clues = Vec::new();
        for needle in cmd.lhs.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match self.known_clue(ch, needle) {
                Ok(id) => {
                    let clue = self.store.clue(id)?;
                    if clue.allow_sharing {
                        clues.push(id);
                    } else {
                        problems.push_str(&format!("{} cannot be shared. ", clue.name));
                    }
                }
                Err(e) => problems.push_str(&format!("{e} ")),
            }
        }
        if clues.is_empty() {
            let problems = problems.trim_end();
            return Err(DeskError::invalid(if problems.is_empty() {
                "Usage: clues/share <clue>[,<clue>...]=<character>[,<character>...]/<note>"
            } else {
                problems
            }));
        }
        let rhs = cmd
            .rhs
            .filter(|r| !r.is_empty())
            .ok_or_else(|| DeskError::invalid("Who are you sharing with?"))?;
        let (names, note) = rhs.split_once('/').ok_or_else(|| {
            DeskError::invalid(
                "You must provide a note that gives context to the clues you're sharing.",
            )
        })?;
        let note = note.trim();
        if note.chars().count() < self.config.min_share_note {
            return Err(DeskError::invalid(
                "Please write a longer note that gives context to the clues you're sharing.",
            ));
        }
        let mut targets = Vec::new();
        for name in names.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let target = self
                .store
                .find_character(name)
                .map(|c| c.id)
                .ok_or_else(|| DeskError::invalid(format!("Could not find '{name}'.")))?;
            if target == ch {
                return Err(DeskError::invalid("You cannot share clues with yourself."));
            }
            targets.push(target);
        }
        if targets.is_empty() {
            return Err(DeskError::invalid("Who are you sharing with?"));
        }

        let (fresh, known): (Vec<_>, Vec<_>) = targets
            .iter()
            .flat_map(|&target| clues.iter().map(move |&clue| (target, clue)))
            .partition(|&(target, clue)| !self.store.knows_clue(target, clue));
        let mut already = String::new();
        for &(target, clue) in &known {
            already.push_str(&format!(
                "{} already knows {}. ",
                self.store.character_name(target),
                self.store.clue(clue)?.name
            ));
        }
        if fresh.is_empty() {
            problems.push_str(&already);
            return Err(DeskError::invalid(problems.trim_end()));
        }

        let per_share = self.costs(ch)?.share_ap;
        let cost = u32::try_from(fresh.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(per_share);
        self.store
            .character_mut(ch)?
            .pay(&Cost::action_points(cost))
            .map_err(|_| {
                DeskError::insufficient(format!(
                    "Sharing the clue(s) with them would cost {cost} action points."
                ))
            })?;
        for &(target, clue) in &fresh {
            self.share(ch, clue, target, note, None)?;
        }
        if !already.is_empty() {
            self.notifier.notify(ch, already.trim_end(), DISCOVERY);
        }
        tracing::info!(
            sharer = %ch,
            shared = fresh.len(),
            skipped = known.len(),
            cost,
            "clues shared"
        );

        let mut clue_names: Vec<&str> = Vec::new();
        let mut target_names: Vec<&str> = Vec::new();
        for &(target, clue) in &fresh {
            let name = self.store.character_name(target);
            if !target_names.contains(&name) {
                target_names.push(name);
            }
            if let Some(clue) = self.store.get_clue(clue)
                && !clue_names.contains(&clue.name.as_str())
            {
                clue_names.push(clue.name.as_str());
            }
        }
        let mut out = problems;
        out.push_str(&already);
        out.push_str(&format!(
            "You have shared the clue(s) '{}' with {}.\nYour note: {note}",
            clue_names.join(", "),
            target_names.join(", ")
        ));
        Ok(out)
    }

    pub(crate) fn do_clue_add_note(
        &mut self,
        ch: CharacterId,
        cmd: &Command<'_>,
    ) -> DeskResult<String> {
        let clue = self.known_clue(ch, cmd.lhs)?;
        let text = cmd
            .rhs
            .filter(|r| !r.is_empty())
            .ok_or_else(|| DeskError::invalid("Must contain a note to add."))?;
        let entry = format!(
            "[{}] {} wrote: {text}",
            Utc::now().format("%x %X"),
            self.store.character_name(ch)
        );
        let disco = self
            .store
            .clue_discovery_mut(ch, clue)
            .ok_or(spur_core::LoreError::ClueNotFound(clue))?;
        if !disco.notes.is_empty() {
            disco.notes.push('\n');
        }
        disco.notes.push_str(&entry);
        let disco = self
            .store
            .clue_discovery(ch, clue)
            .ok_or(spur_core::LoreError::ClueNotFound(clue))?;
        Ok(display::discovery(&self.store, disco, false))
    }

    pub(crate) fn do_revelations(&mut self, ch: CharacterId, lhs: &str) -> DeskResult<String> {
        if lhs.is_empty() {
            let mut out = format!("Discovered Revelations\n{:<14}Subject", "Revelation #");
            for disco in self.store.revelation_discoveries_of(ch) {
                if let Some(rev) = self.store.get_revelation(disco.revelation) {
                    out.push_str(&format!("\n{:<14}{}", rev.id.to_string(), rev.name));
                }
            }
            return Ok(out);
        }
        let rev: RevelationId = self
            .store
            .resolve_revelation(lhs)
            .ok()
            .filter(|id| self.store.knows_revelation(ch, *id))
            .ok_or_else(|| DeskError::invalid("No revelation by that number."))?;
        let shown = self
            .store
            .get_revelation(rev)
            .map(display::revelation)
            .unwrap_or_default();
        let related: Vec<&str> = self
            .store
            .usage_for_revelation(rev)
            .iter()
            .filter(|u| self.store.knows_clue(ch, u.clue))
            .filter_map(|u| self.store.get_clue(u.clue))
            .map(|c| c.name.as_str())
            .collect();
        Ok(format!("{shown}Related Clues: {}", related.join("; ")))
    }

    pub(crate) fn do_check_missed(&mut self, ch: CharacterId) -> DeskResult<String> {
        let mut out = String::from("Checking for missed revelations...\n");
        for id in self.check_missed(ch)? {
            if let Some(rev) = self.store.get_revelation(id) {
                out.push_str(&format!("You were missing a revelation: {}\n", rev.name));
            }
        }
        out.push_str("Done!");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::table;
    use spur_core::{Clue, ClueForRevelation, Revelation};

    const NOTE: &str = "We spent the evening at the tavern comparing notes about the drains, \
                        and I told Tobin what I saw under the mill.";

    #[test]
    fn list_and_view_known_clues() {
        let mut t = table();
        let out = t.desk.process(t.mira, "clues").unwrap();
        assert_eq!(out.lines().count(), 2);
        t.desk.grant(t.mira, t.nest).unwrap();
        let out = t.desk.process(t.mira, "clues").unwrap();
        assert!(out.starts_with("Discovered Clues\nClue #"));
        assert!(out.contains("Rat Nest"));
        assert!(out.contains("Game Lore"));

        let out = t.desk.process(t.mira, "clue rat nest").unwrap();
        assert!(out.contains("This clue was given to you by staff."));
        assert!(out.contains("[Rat Nest] (20 Rating) Tags: rats, sewers"));
        assert_eq!(t.desk.process(t.mira, "clues/view Rat Nest").unwrap(), out);
        let err = t.desk.process(t.mira, "clues Old Well").unwrap_err();
        assert_eq!(err.to_string(), "No clue found by this ID: Old Well.");
    }

    #[test]
    fn search_known_clues() {
        let mut t = table();
        t.desk.grant(t.mira, t.nest).unwrap();
        t.desk.grant(t.mira, t.well).unwrap();
        let out = t.desk.process(t.mira, "clues/search mill").unwrap();
        assert!(out.contains("Rat Nest"));
        assert!(!out.contains("Old Well"));
        let out = t.desk.process(t.mira, "clues/search Sewers").unwrap();
        assert!(out.contains("Rat Nest"));
        assert!(out.contains("Old Well"));
    }

    #[test]
    fn share_charges_ap_and_teaches_the_clue() {
        let mut t = table();
        t.desk.grant(t.mira, t.nest).unwrap();
        let out = t
            .desk
            .process(t.mira, &format!("clues/share Rat Nest=Tobin/{NOTE}"))
            .unwrap();
        assert_eq!(
            out,
            format!("You have shared the clue(s) 'Rat Nest' with Tobin.\nYour note: {NOTE}")
        );
        // investigation 2: trunc(100 / 7) + 1
        assert_eq!(t.desk.store().character(t.mira).unwrap().action_points, 85);
        let disco = t.desk.store().clue_discovery(t.tobin, t.nest).unwrap();
        assert_eq!(disco.revealed_by, Some(t.mira));
        assert!(disco.message.ends_with(NOTE));
        let shown = t.desk.process(t.mira, "clues Rat Nest").unwrap();
        assert!(shown.contains("Shared with: Tobin"));
    }

    #[test]
    fn share_skips_clues_they_already_know() {
        let mut t = table();
        t.desk.grant(t.mira, t.nest).unwrap();
        t.desk.grant(t.mira, t.well).unwrap();
        t.desk.grant(t.tobin, t.nest).unwrap();
        let err = t
            .desk
            .process(t.mira, &format!("clues/share Rat Nest=Tobin/{NOTE}"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Tobin already knows Rat Nest.");
        assert_eq!(t.desk.store().character(t.mira).unwrap().action_points, 100);

        let out = t
            .desk
            .process(t.mira, &format!("clues/share Rat Nest,Old Well=Tobin/{NOTE}"))
            .unwrap();
        assert_eq!(
            out,
            format!(
                "Tobin already knows Rat Nest. You have shared the clue(s) 'Old Well' \
                 with Tobin.\nYour note: {NOTE}"
            )
        );
        // Only the new clue is paid for.
        assert_eq!(t.desk.store().character(t.mira).unwrap().action_points, 85);
        let told = t.desk.notifier().for_character(t.mira);
        assert_eq!(told.last().unwrap().message, "Tobin already knows Rat Nest.");
    }

    #[test]
    fn share_validation() {
        let mut t = table();
        t.desk.grant(t.mira, t.nest).unwrap();
        let err = t.desk.process(t.mira, "clues/share Rat Nest").unwrap_err();
        assert_eq!(err.to_string(), "Who are you sharing with?");
        let err = t
            .desk
            .process(t.mira, "clues/share Rat Nest=Tobin")
            .unwrap_err();
        assert!(err.to_string().starts_with("You must provide a note"));
        let err = t
            .desk
            .process(t.mira, "clues/share Rat Nest=Tobin/hi")
            .unwrap_err();
        assert!(err.to_string().starts_with("Please write a longer note"));
        let err = t
            .desk
            .process(t.mira, &format!("clues/share Old Well=Tobin/{NOTE}"))
            .unwrap_err();
        assert_eq!(err.to_string(), "No clue found by this ID: Old Well.");

        t.desk.store_mut().character_mut(t.mira).unwrap().action_points = 10;
        let err = t
            .desk
            .process(t.mira, &format!("clues/share Rat Nest=Tobin/{NOTE}"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sharing the clue(s) with them would cost 15 action points."
        );
        assert!(!t.desk.store().knows_clue(t.tobin, t.nest));
    }

    #[test]
    fn unshareable_clues_are_refused() {
        let mut t = table();
        let secret = t
            .desk
            .store_mut()
            .add_clue(Clue::new("Mira's Secret", 10).shareable(false))
            .unwrap();
        t.desk.grant(t.mira, secret).unwrap();
        let err = t
            .desk
            .process(t.mira, &format!("clues/share Mira's Secret=Tobin/{NOTE}"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Mira's Secret cannot be shared.");
    }

    #[test]
    fn add_note_appends() {
        let mut t = table();
        t.desk.grant(t.mira, t.nest).unwrap();
        let err = t.desk.process(t.mira, "clues/addnote Rat Nest").unwrap_err();
        assert_eq!(err.to_string(), "Must contain a note to add.");
        t.desk
            .process(t.mira, "clues/addnote Rat Nest=Bring a cat.")
            .unwrap();
        let out = t
            .desk
            .process(t.mira, "clues/addnote Rat Nest=Two cats.")
            .unwrap();
        let notes = &t.desk.store().clue_discovery(t.mira, t.nest).unwrap().notes;
        assert_eq!(notes.lines().count(), 2);
        assert!(notes.lines().next().unwrap().ends_with("Mira wrote: Bring a cat."));
        assert!(out.contains("Mira wrote: Two cats."));
    }

    #[test]
    fn revelations_list_view_and_check_missed() {
        let mut t = table();
        t.desk.grant(t.mira, t.nest).unwrap();
        let rev = t
            .desk
            .store_mut()
            .add_revelation(Revelation::new("The Rat King", 20).with_desc("It wears a crown."))
            .unwrap();
        t.desk
            .store_mut()
            .link_clue(ClueForRevelation::new(t.nest, rev))
            .unwrap();
        let err = t.desk.process(t.mira, "revelations rat king").unwrap_err();
        assert_eq!(err.to_string(), "No revelation by that number.");

        let out = t.desk.process(t.mira, "revelations/checkmissed").unwrap();
        assert_eq!(
            out,
            "Checking for missed revelations...\n\
             You were missing a revelation: The Rat King\n\
             Done!"
        );
        let out = t.desk.process(t.mira, "revelations").unwrap();
        assert!(out.contains("The Rat King"));
        let out = t.desk.process(t.mira, "revelations the rat king").unwrap();
        assert_eq!(out, "The Rat King\nIt wears a crown.\nRelated Clues: Rat Nest");

        let again = t.desk.process(t.mira, "revelations/checkmissed").unwrap();
        assert_eq!(again, "Checking for missed revelations...\nDone!");
    }
}
