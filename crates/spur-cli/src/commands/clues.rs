use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use super::LoreFile;

pub fn run(file: &Path, tag: Option<&str>) -> Result<(), String> {
    let lore = LoreFile::load(file)?;
    let store = &lore.store;

    let clues = match tag {
        Some(name) => {
            let tag = store
                .find_tag(name)
                .ok_or_else(|| format!("no search tag named \"{name}\""))?;
            store.query().require_tag(tag.id).execute()
        }
        None => store.clues(),
    };

    if clues.is_empty() {
        println!("  No clues found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Type", "Rating", "Tags", "Investigable", "Known by"]);

    for clue in &clues {
        let tags = store.tag_names(&clue.search_tags).join(", ");
        table.add_row(vec![
            clue.id.to_string(),
            clue.name.clone(),
            clue.clue_type.to_string(),
            clue.rating.to_string(),
            if tags.is_empty() { "-".to_string() } else { tags },
            if clue.allow_investigation { "yes" } else { "no" }.to_string(),
            store.discovery_count(clue.id).to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} clues", clues.len());

    Ok(())
}
