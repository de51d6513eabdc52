use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use spur_core::{Character, CharacterKind, LoreStore};

use super::LoreFile;

pub fn run(file: &Path, name: &str) -> Result<(), String> {
    let lore = LoreFile::load(file)?;
    let store = &lore.store;
    let id = lore.character(name)?;
    let character = store.character(id).map_err(|e| e.to_string())?;

    // Header
    let kind = match &character.kind {
        CharacterKind::Player => "player".to_string(),
        CharacterKind::Retainer {
            owner,
            assistant_level,
        } => format!(
            "retainer of {}, assistant level {assistant_level}",
            store.character_name(*owner)
        ),
    };
    println!("  {} [{}]", character.name.bold(), kind.dimmed());
    println!();

    print_sheet(character);

    let known = store.clue_discoveries_of(id);
    if !known.is_empty() {
        println!();
        println!("  {}", "Clues".bold());
        for disco in known {
            if let Some(clue) = store.get_clue(disco.clue) {
                println!(
                    "    {} {}",
                    clue.name,
                    format!("({})", disco.discovery_method).dimmed()
                );
            }
        }
    }

    let revelations = store.revelation_discoveries_of(id);
    if !revelations.is_empty() {
        println!();
        println!("  {}", "Revelations".bold());
        for disco in revelations {
            if let Some(rev) = store.get_revelation(disco.revelation) {
                println!("    {}", rev.name);
            }
        }
    }

    print_investigations(store, character);

    Ok(())
}

fn print_sheet(character: &Character) {
    let mut stats: Vec<_> = character.stats.iter().collect();
    stats.sort();
    let mut skills: Vec<_> = character.skills.iter().collect();
    skills.sort();
    let join = |pairs: Vec<(&String, &u32)>| {
        pairs
            .into_iter()
            .map(|(name, value)| format!("{name} {value}"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    if !stats.is_empty() {
        println!("  stats:     {}", join(stats));
    }
    if !skills.is_empty() {
        println!("  skills:    {}", join(skills));
    }
    println!("  ap:        {}", character.action_points);
    println!("  silver:    {}", character.silver);
    println!(
        "  resources: {} economic, {} military, {} social",
        character.economic, character.military, character.social
    );
}

fn print_investigations(store: &LoreStore, character: &Character) {
    let investigations = store.investigations_of(character.id);
    if investigations.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Topic", "Status", "Progress"]);
    for inv in &investigations {
        let status = if !inv.ongoing {
            "closed"
        } else if inv.active {
            "active"
        } else {
            "idle"
        };
        table.add_row(vec![
            inv.id.to_string(),
            inv.topic.clone(),
            status.to_string(),
            format!("{}%", inv.progress_percentage()),
        ]);
    }

    println!();
    println!("  {}", "Investigations".bold());
    println!("{table}");
}
