use std::path::Path;

use colored::Colorize;
use spur_desk::Actor;

use super::LoreFile;

/// Run `lines` in order as one sitting at the desk, then save.
///
/// Draft investigations only live for the sitting, so a whole
/// `investigate/new` .. `investigate/finish` sequence goes in one call. The
/// first failing line stops the run; the lines before it are kept.
pub fn run(file: &Path, actor: Option<&str>, lines: &[String], seed: u64) -> Result<(), String> {
    let lore = LoreFile::load(file)?;
    let actor = match actor {
        Some(name) => Actor::Character(lore.character(name)?),
        None => Actor::Staff,
    };

    let mut desk = lore.into_desk(seed);
    let mut failure = None;
    for line in lines {
        if lines.len() > 1 {
            println!("{}", format!("> {line}").dimmed());
        }
        match desk.process(actor, line) {
            Ok(out) if out.is_empty() => {}
            Ok(out) => println!("{out}"),
            Err(e) => {
                tracing::debug!(line = %line, error = %e, "command refused");
                failure = Some(e.to_string());
                break;
            }
        }
    }

    LoreFile::from_desk(desk).save(file)?;
    match failure {
        Some(msg) => Err(msg),
        None => Ok(()),
    }
}
