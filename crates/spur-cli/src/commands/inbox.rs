use std::path::Path;

use colored::Colorize;

use super::LoreFile;

pub fn run(file: &Path, name: Option<&str>) -> Result<(), String> {
    let lore = LoreFile::load(file)?;
    let messages = match name {
        Some(name) => lore.inbox.for_character(lore.character(name)?),
        None => lore.inbox.staff(),
    };

    if messages.is_empty() {
        println!("  No messages.");
        return Ok(());
    }

    for note in &messages {
        println!(
            "{} {}",
            note.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            format!("[{}]", note.category).dimmed()
        );
        for line in note.message.lines() {
            println!("  {line}");
        }
    }
    println!();
    println!("  {} messages", messages.len());

    Ok(())
}
