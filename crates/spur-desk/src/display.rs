//! Player-facing text for clues, discoveries, and investigations.

use spur_core::{CharacterId, Clue, ClueDiscovery, Investigation, LoreStore, Revelation};

/// `[name] (N Rating) Tags: a, b` then the description, then `disco_msg`.
/// GM notes are appended for staff.
pub fn clue(store: &LoreStore, clue: &Clue, disco_msg: &str, show_gm_notes: bool) -> String {
    let mut msg = format!("[{}] ({} Rating)", clue.name, clue.rating);
    let tags = store.tag_names(&clue.search_tags);
    if !tags.is_empty() {
        msg.push_str(&format!(" Tags: {}", tags.join(", ")));
    }
    msg.push_str(&format!("\n{}\n", clue.desc));
    msg.push_str(disco_msg);
    if show_gm_notes && !clue.gm_notes.is_empty() {
        msg.push_str(&format!("\nGM Notes: {}\n", clue.gm_notes));
    }
    msg
}

/// A discovered clue with the date and message of its discovery.
pub fn discovery(store: &LoreStore, disco: &ClueDiscovery, show_gm_notes: bool) -> String {
    let Some(found) = store.get_clue(disco.clue) else {
        return String::new();
    };
    let mut msg = String::new();
    if !disco.message.is_empty() {
        msg.push_str(&format!(
            "{} {}\n",
            disco.date.format("%x %X"),
            disco.message
        ));
    }
    if !disco.notes.is_empty() {
        msg.push_str(&format!("Notes: {}\n", disco.notes));
    }
    let shared = store.shared_with(disco.character, disco.clue);
    if !shared.is_empty() {
        let names: Vec<&str> = shared.iter().map(|id| store.character_name(*id)).collect();
        msg.push_str(&format!("Shared with: {}\n", names.join(", ")));
    }
    clue(store, found, &msg, show_gm_notes)
}

/// Name and description.
pub fn revelation(revelation: &Revelation) -> String {
    format!("{}\n{}\n", revelation.name, revelation.desc)
}

/// What the investigator and their helpers see.
pub fn investigation(store: &LoreStore, inv: &Investigation, difficulty: i32) -> String {
    let mut msg = format!("ID: {}", inv.id);
    if !inv.active {
        msg.push_str(" (Investigation Not Currently Active)");
    }
    msg.push_str(&format!(
        "\nCharacter: {}\n",
        store.character_name(inv.character)
    ));
    msg.push_str(&format!("Topic: {}\n", inv.topic));
    msg.push_str(&format!("Actions: {}\n", inv.actions));
    msg.push_str(&format!("Modified Difficulty: {difficulty}\n"));
    msg.push_str(&format!("Current Progress: {}\n", inv.progress_str()));
    msg.push_str(&format!("Stat used: {}\n", inv.stat_used));
    msg.push_str(&format!("Skill used: {}\n", inv.skill_used));
    for helper in inv.active_assistants() {
        msg.push_str(&format!(
            "Assistant: {} Stat: {} Skill: {} Actions: {}\n",
            helper_name(store, helper.character),
            helper.stat_used,
            helper.skill_used,
            helper.actions
        ));
    }
    msg
}

/// The player view plus the numbers staff need.
pub fn gm_investigation(
    store: &LoreStore,
    inv: &Investigation,
    difficulty: i32,
    succeeds: bool,
) -> String {
    let mut msg = investigation(store, inv, difficulty);
    let target = inv
        .clue_target
        .and_then(|id| store.get_clue(id))
        .map_or("None", |c| c.name.as_str());
    msg.push_str(&format!("Current Roll: {}\n", inv.roll));
    msg.push_str(&format!("Targeted Clue: {target}\n"));
    msg.push_str(&format!("Progress Value: {}\n", inv.progress));
    msg.push_str(&format!("Completion Value: {}\n", inv.completion_value));
    msg.push_str(&format!("Complete this week?: {succeeds}\n"));
    msg.push_str(&format!("Silver Used: {}\n", inv.silver));
    msg.push_str(&format!("Economic Used: {}\n", inv.economic));
    msg.push_str(&format!("Military Used: {}\n", inv.military));
    msg.push_str(&format!("Social Used: {}\n", inv.social));
    msg.push_str(&format!("Action Points Used: {}\n", inv.action_points));
    msg
}

/// A helper's name, with the owner in parentheses for retainers.
pub fn helper_name(store: &LoreStore, character: CharacterId) -> String {
    let Some(helper) = store.get_character(character) else {
        return store.character_name(character).to_string();
    };
    if helper.is_player() {
        return helper.name.clone();
    }
    format!(
        "{} ({})",
        helper.name,
        store.character_name(helper.discovery_recipient())
    )
}
