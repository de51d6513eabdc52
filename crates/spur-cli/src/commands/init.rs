use std::path::Path;

use spur_core::{
    Character, Clue, ClueForRevelation, ClueType, GameSettings, LoreResult, LoreStore, Revelation,
    SearchTag,
};

use super::LoreFile;

pub fn run(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Err(format!("'{}' already exists", path.display()));
    }

    let lore = LoreFile {
        settings: GameSettings::new(),
        store: sample_store().map_err(|e| format!("cannot build sample lore: {e}"))?,
        ..LoreFile::default()
    };
    lore.save(path)?;

    println!("Created lore file '{}'", path.display());
    println!(
        "  {} clues, {} revelation, {} characters",
        lore.store.clue_count(),
        lore.store.revelation_count(),
        lore.store.character_count()
    );
    println!();
    println!("Get started:");
    println!("  spur clues                                  # What there is to find");
    println!("  spur exec --as Mira investigate/new \\");
    println!("      \"investigate/topic rats\" \"investigate/story I follow the rats.\" \\");
    println!("      investigate/finish");
    println!("  spur week                                   # Roll for every active investigation");
    println!("  spur show Mira                              # What Mira knows now");

    Ok(())
}

/// The rats under the old mill, and the cult behind them.
fn sample_store() -> LoreResult<LoreStore> {
    let mut store = LoreStore::new();

    let rats = store.add_tag(SearchTag::new("rats"))?;
    let sewers = store.add_tag(SearchTag::new("sewers"))?;
    let mill = store.add_tag(SearchTag::new("mill"))?;
    let cult = store.add_tag(SearchTag::new("cult"))?;

    let nest = store.add_clue(
        Clue::new("Rat Nest", 20)
            .with_desc("Hundreds of rats nest in the tunnels under the old mill.")
            .investigable(true)
            .with_tag(rats)
            .with_tag(sewers),
    )?;
    let well = store.add_clue(
        Clue::new("Old Well", 10)
            .with_desc("The dry well behind the mill drops straight into the sewers.")
            .investigable(true)
            .with_tag(sewers)
            .with_tag(mill),
    )?;
    let ledger = store.add_clue(
        Clue::new("Miller's Ledger", 20)
            .with_desc("The miller buys far more grain than the mill could ever grind.")
            .investigable(true)
            .with_tag(mill),
    )?;
    let sigils = store.add_clue(
        Clue::new("Chalk Sigils", 30)
            .with_desc("Fresh chalk circles mark the tunnel walls, each with a gnawed bone.")
            .with_type(ClueType::Vision)
            .investigable(true)
            .shareable(false)
            .with_tag(cult)
            .with_tag(sewers),
    )?;

    let undermill = store.add_revelation(
        Revelation::new("The Undermill Cult", 50)
            .with_desc("Someone is feeding the rats on purpose, and the miller is paying for it.")
            .in_mystery("Rats of Kettleford"),
    )?;
    store.link_clue(ClueForRevelation::new(sigils, undermill))?;
    store.link_clue(ClueForRevelation::new(ledger, undermill))?;
    store.link_clue(ClueForRevelation::new(nest, undermill).optional())?;
    store.link_clue(ClueForRevelation::new(well, undermill).optional().at_tier(1))?;

    let mira = store.add_character(
        Character::new("Mira")
            .with_stat("perception", 3)
            .with_stat("intellect", 2)
            .with_skill("investigation", 2)
            .with_resources(60_000, 20, 10, 40),
    )?;
    store.add_character(
        Character::new("Tobin")
            .with_stat("perception", 2)
            .with_stat("charm", 3)
            .with_skill("investigation", 1)
            .with_skill("streetwise", 2)
            .with_resources(20_000, 10, 30, 30),
    )?;
    store.add_character(Character::retainer("Pip", mira, 2))?;

    Ok(store)
}
