//! Text commands: `word/switch lhs=rhs`.
//!
//! A command word and its switch are looked up together in [`COMMANDS`].
//! Each [`CommandKind`] has a handler on [`Desk`], split by command word
//! into the submodules here.

mod assist;
mod clues;
#[cfg(test)]
pub(crate) mod fixture;
mod gm;
mod investigate;

use spur_core::{CharacterId, InvestigationId, LoreError};

use crate::desk::Desk;
use crate::error::{DeskError, DeskResult};
use crate::notify::Notifier;

/// Who is typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// A player acting as their character.
    Character(CharacterId),
    /// Staff, who may use `gminvest`.
    Staff,
}

impl From<CharacterId> for Actor {
    fn from(id: CharacterId) -> Self {
        Self::Character(id)
    }
}

/// Every command the desk understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `investigate [id]`
    Investigate,
    /// `investigate/history`
    History,
    /// `investigate/new`
    New,
    /// `investigate/topic`
    Topic,
    /// `investigate/story`
    Story,
    /// `investigate/stat`
    Stat,
    /// `investigate/skill`
    Skill,
    /// `investigate/cancel`
    Cancel,
    /// `investigate/finish`
    Finish,
    /// `investigate/view`
    View,
    /// `investigate/active`
    Active,
    /// `investigate/silver`
    Silver,
    /// `investigate/resource`
    Resource,
    /// `investigate/actionpoints`
    ActionPoints,
    /// `investigate/pause`
    Pause,
    /// `investigate/abandon`
    Abandon,
    /// `investigate/resume`
    Resume,
    /// `investigate/changestory`
    ChangeStory,
    /// `investigate/changestat`
    ChangeStat,
    /// `investigate/changeskill`
    ChangeSkill,
    /// `investigate/requesthelp`
    RequestHelp,
    /// `assist [id[=retainer]]`
    Assist,
    /// `assist/stop [id][=retainer]`
    AssistStop,
    /// `assist/resume <id>[=retainer]`
    AssistResume,
    /// `gminvest [id]`
    GmList,
    /// `gminvest/view`
    GmView,
    /// `gminvest/target`
    GmTarget,
    /// `gminvest/randomtarget`
    GmRandomTarget,
    /// `gminvest/roll`
    GmRoll,
    /// `gminvest/result`
    GmResult,
    /// `gminvest/setprogress`
    GmSetProgress,
    /// `gminvest/grant`
    GmGrant,
    /// `gminvest/search`
    GmSearch,
    /// `clues [clue]`, `clues/view <clue>`
    Clues,
    /// `clues/search`
    ClueSearch,
    /// `clues/share`
    ClueShare,
    /// `clues/addnote`
    ClueAddNote,
    /// `revelations [revelation]`
    Revelations,
    /// `revelations/checkmissed`
    CheckMissed,
}

/// `(word, switch, kind)`. An empty switch is the bare command.
pub const COMMANDS: &[(&str, &str, CommandKind)] = &[
    ("investigate", "", CommandKind::Investigate),
    ("investigate", "history", CommandKind::History),
    ("investigate", "new", CommandKind::New),
    ("investigate", "topic", CommandKind::Topic),
    ("investigate", "tags", CommandKind::Topic),
    ("investigate", "tag", CommandKind::Topic),
    ("investigate", "story", CommandKind::Story),
    ("investigate", "stat", CommandKind::Stat),
    ("investigate", "skill", CommandKind::Skill),
    ("investigate", "cancel", CommandKind::Cancel),
    ("investigate", "finish", CommandKind::Finish),
    ("investigate", "view", CommandKind::View),
    ("investigate", "active", CommandKind::Active),
    ("investigate", "silver", CommandKind::Silver),
    ("investigate", "resource", CommandKind::Resource),
    ("investigate", "resources", CommandKind::Resource),
    ("investigate", "actionpoints", CommandKind::ActionPoints),
    ("investigate", "pause", CommandKind::Pause),
    ("investigate", "abandon", CommandKind::Abandon),
    ("investigate", "stop", CommandKind::Abandon),
    ("investigate", "resume", CommandKind::Resume),
    ("investigate", "changestory", CommandKind::ChangeStory),
    ("investigate", "changestat", CommandKind::ChangeStat),
    ("investigate", "changeskill", CommandKind::ChangeSkill),
    ("investigate", "requesthelp", CommandKind::RequestHelp),
    ("assist", "", CommandKind::Assist),
    ("assist", "stop", CommandKind::AssistStop),
    ("assist", "resume", CommandKind::AssistResume),
    ("gminvest", "", CommandKind::GmList),
    ("gminvest", "view", CommandKind::GmView),
    ("gminvest", "target", CommandKind::GmTarget),
    ("gminvest", "randomtarget", CommandKind::GmRandomTarget),
    ("gminvest", "roll", CommandKind::GmRoll),
    ("gminvest", "result", CommandKind::GmResult),
    ("gminvest", "setprogress", CommandKind::GmSetProgress),
    ("gminvest", "grant", CommandKind::GmGrant),
    ("gminvest", "search", CommandKind::GmSearch),
    ("clues", "", CommandKind::Clues),
    ("clues", "view", CommandKind::Clues),
    ("clues", "search", CommandKind::ClueSearch),
    ("clues", "share", CommandKind::ClueShare),
    ("clues", "addnote", CommandKind::ClueAddNote),
    ("revelations", "", CommandKind::Revelations),
    ("revelations", "checkmissed", CommandKind::CheckMissed),
];

/// Other words accepted for a command word.
const ALIASES: &[(&str, &str)] = &[
    ("investigations", "investigate"),
    ("helpinvestigate", "assist"),
    ("gminvestigations", "gminvest"),
    ("clue", "clues"),
];

impl CommandKind {
    /// Find the command for `word` and `switch`, ignoring case.
    pub fn lookup(word: &str, switch: &str) -> Option<Self> {
        let word = word.to_lowercase();
        let word = ALIASES
            .iter()
            .find(|(alias, _)| *alias == word)
            .map_or(word.as_str(), |(_, canonical)| canonical);
        let switch = switch.to_lowercase();
        COMMANDS
            .iter()
            .find(|(w, s, _)| *w == word && *s == switch)
            .map(|(_, _, kind)| *kind)
    }

    /// Whether only staff may use it.
    pub fn is_staff(self) -> bool {
        matches!(
            self,
            Self::GmList
                | Self::GmView
                | Self::GmTarget
                | Self::GmRandomTarget
                | Self::GmRoll
                | Self::GmResult
                | Self::GmSetProgress
                | Self::GmGrant
                | Self::GmSearch
        )
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    /// What to do.
    pub kind: CommandKind,
    /// Everything after the command word, trimmed.
    pub args: &'a str,
    /// The part of `args` before `=`, or all of it.
    pub lhs: &'a str,
    /// The part of `args` after `=`, if there was one.
    pub rhs: Option<&'a str>,
}

impl<'a> Command<'a> {
    /// Parse `word[/switch] [lhs[=rhs]]`.
    pub fn parse(input: &'a str) -> DeskResult<Self> {
        let trimmed = input.trim();
        let (head, args) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };
        let (word, switch) = head.split_once('/').unwrap_or((head, ""));
        let kind = CommandKind::lookup(word, switch)
            .ok_or_else(|| DeskError::UnknownCommand(head.to_string()))?;
        let (lhs, rhs) = match args.split_once('=') {
            Some((lhs, rhs)) => (lhs.trim(), Some(rhs.trim())),
            None => (args, None),
        };
        Ok(Self {
            kind,
            args,
            lhs,
            rhs,
        })
    }

    /// The right-hand side, or an error naming the expected form.
    pub fn require_rhs(&self, usage: &str) -> DeskResult<&'a str> {
        self.rhs
            .filter(|rhs| !rhs.is_empty())
            .ok_or_else(|| DeskError::invalid(format!("Usage: {usage}")))
    }

    /// The right-hand side split on commas.
    pub fn rhs_list(&self) -> Vec<&'a str> {
        self.rhs
            .map(|rhs| {
                rhs.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A positive whole number.
pub(crate) fn parse_amount<T: std::str::FromStr + Default + PartialOrd>(
    text: &str,
    msg: &str,
) -> DeskResult<T> {
    text.trim()
        .parse::<T>()
        .ok()
        .filter(|n| *n > T::default())
        .ok_or_else(|| DeskError::invalid(msg))
}

impl<N: Notifier> Desk<N> {
    /// Run one command line and return what the actor sees.
    pub fn process(&mut self, actor: impl Into<Actor>, input: &str) -> DeskResult<String> {
        if input.trim().is_empty() {
            return Ok(String::new());
        }
        let cmd = Command::parse(input)?;
        tracing::debug!(kind = ?cmd.kind, args = cmd.args, "command");
        let ch = match (actor.into(), cmd.kind.is_staff()) {
            (Actor::Staff, true) => return self.do_gm(&cmd),
            (Actor::Character(_), true) => {
                return Err(DeskError::state("Only staff may do that."));
            }
            (Actor::Staff, false) => {
                return Err(DeskError::state("That command needs a character."));
            }
            (Actor::Character(ch), false) => ch,
        };
        self.store.character(ch)?;

        match cmd.kind {
            CommandKind::Investigate => self.do_investigate(ch, &cmd),
            CommandKind::History => self.do_history(ch),
            CommandKind::New => self.do_new(ch),
            CommandKind::Topic => self.do_topic(ch, cmd.args),
            CommandKind::Story => self.do_story(ch, cmd.args),
            CommandKind::Stat => self.do_stat(ch, cmd.args),
            CommandKind::Skill => self.do_skill(ch, cmd.args),
            CommandKind::Cancel => self.do_cancel(ch),
            CommandKind::Finish => self.do_finish(ch),
            CommandKind::View => self.do_view(ch, cmd.lhs),
            CommandKind::Active => self.do_active(ch, cmd.lhs),
            CommandKind::Silver => self.do_silver(ch, &cmd),
            CommandKind::Resource => self.do_resource(ch, &cmd),
            CommandKind::ActionPoints => self.do_action_points(ch, &cmd),
            CommandKind::Pause => self.do_pause(ch, cmd.lhs),
            CommandKind::Abandon => self.do_abandon(ch, cmd.lhs),
            CommandKind::Resume => self.do_resume(ch, cmd.lhs),
            CommandKind::ChangeStory => self.do_change_story(ch, &cmd),
            CommandKind::ChangeStat => self.do_change_stat(ch, &cmd),
            CommandKind::ChangeSkill => self.do_change_skill(ch, &cmd),
            CommandKind::RequestHelp => self.do_request_help(ch, &cmd),
            CommandKind::Assist => self.do_assist(ch, &cmd),
            CommandKind::AssistStop => self.do_assist_stop(ch, &cmd),
            CommandKind::AssistResume => self.do_assist_resume(ch, &cmd),
            CommandKind::Clues => self.do_clues(ch, cmd.lhs),
            CommandKind::ClueSearch => self.do_clue_search(ch, cmd.args),
            CommandKind::ClueShare => self.do_clue_share(ch, &cmd),
            CommandKind::ClueAddNote => self.do_clue_add_note(ch, &cmd),
            CommandKind::Revelations => self.do_revelations(ch, cmd.lhs),
            CommandKind::CheckMissed => self.do_check_missed(ch),
            _ => Err(DeskError::UnknownCommand(cmd.args.to_string())),
        }
    }

    /// Resolve an investigation ID prefix with player-facing errors.
    pub(crate) fn find_investigation(&self, needle: &str) -> DeskResult<InvestigationId> {
        if needle.trim().is_empty() {
            return Err(DeskError::invalid("Must give ID of investigation."));
        }
        self.store.resolve_investigation(needle).map_err(|e| match e {
            LoreError::NoMatch(_) => DeskError::invalid("Investigation not found."),
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_uses_word_and_switch() {
        assert_eq!(
            CommandKind::lookup("investigate", ""),
            Some(CommandKind::Investigate)
        );
        assert_eq!(
            CommandKind::lookup("Investigate", "TAGS"),
            Some(CommandKind::Topic)
        );
        assert_eq!(
            CommandKind::lookup("helpinvestigate", "stop"),
            Some(CommandKind::AssistStop)
        );
        assert_eq!(CommandKind::lookup("investigate", "dance"), None);
        assert!(CommandKind::lookup("gminvest", "roll").unwrap().is_staff());
        assert!(!CommandKind::Clues.is_staff());
    }

    #[test]
    fn parse_splits_lhs_and_rhs() {
        let cmd = Command::parse("  investigate/silver ab12 = 5000 ").unwrap();
        assert_eq!(cmd.kind, CommandKind::Silver);
        assert_eq!(cmd.args, "ab12 = 5000");
        assert_eq!(cmd.lhs, "ab12");
        assert_eq!(cmd.rhs, Some("5000"));

        let cmd = Command::parse("investigate/resource ab12=social, 10").unwrap();
        assert_eq!(cmd.rhs_list(), vec!["social", "10"]);

        let cmd = Command::parse("clues").unwrap();
        assert_eq!(cmd.kind, CommandKind::Clues);
        assert_eq!(cmd.lhs, "");
        assert_eq!(cmd.rhs, None);
        assert!(cmd.require_rhs("clues/addnote <clue>=<text>").is_err());
    }

    #[test]
    fn unknown_commands_are_named() {
        let err = Command::parse("investigate/dance now").unwrap_err();
        assert_eq!(err.to_string(), "unknown command: investigate/dance");
    }

    #[test]
    fn amounts_must_be_positive() {
        assert_eq!(parse_amount::<u32>("15", "bad").unwrap(), 15);
        assert!(parse_amount::<u32>("0", "bad").is_err());
        assert!(parse_amount::<u64>("-5", "bad").is_err());
        assert!(parse_amount::<u32>("lots", "bad").is_err());
    }
}
