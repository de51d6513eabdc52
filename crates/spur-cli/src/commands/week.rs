use std::path::Path;

use colored::Colorize;
use spur_desk::WeeklyCycle;

use super::LoreFile;

pub fn run(file: &Path, seed: u64) -> Result<(), String> {
    let mut desk = LoreFile::load(file)?.into_desk(seed);
    let report = WeeklyCycle::run(&mut desk);

    let names: Vec<(String, String)> = report
        .errors
        .iter()
        .map(|(id, err)| {
            let owner = desk
                .store()
                .get_investigation(*id)
                .map(|inv| desk.store().character_name(inv.character).to_string())
                .unwrap_or_else(|| "someone".to_string());
            (format!("{id} ({owner})"), err.clone())
        })
        .collect();
    LoreFile::from_desk(desk).save(file)?;

    println!("  {}", format!("Week {}", report.week).bold());
    println!(
        "  {} investigations processed: {} succeeded, {} failed",
        report.processed, report.successes, report.failures
    );
    if !names.is_empty() {
        println!();
        for (who, err) in &names {
            println!("  {} {who}: {err}", "skipped".yellow());
        }
    }

    Ok(())
}
