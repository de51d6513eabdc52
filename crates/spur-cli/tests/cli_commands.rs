//! Integration tests for the spur CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn spur() -> Command {
    Command::cargo_bin("spur").unwrap()
}

/// Create a temp directory holding a fresh sample lore file.
fn test_lore() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lore.json");
    spur().arg("init").arg(&path).assert().success();
    (dir, path)
}

fn start_rats_investigation(path: &PathBuf) {
    spur()
        .args(["exec", "--as", "Mira", "-f"])
        .arg(path)
        .args([
            "investigate/new",
            "investigate/topic rats",
            "investigate/story I follow the rats down the drain.",
            "investigate/finish",
        ])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_lore_file() {
    let dir = TempDir::new().unwrap();
    spur()
        .args(["init", "game.json"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created lore file 'game.json'"));

    let text = fs::read_to_string(dir.path().join("game.json")).unwrap();
    assert!(text.contains("Rat Nest"));
    assert!(text.contains("\"week\": 0"));
}

#[test]
fn init_fails_if_file_exists() {
    let (_dir, path) = test_lore();
    spur()
        .arg("init")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ---------------------------------------------------------------------------
// clues
// ---------------------------------------------------------------------------

#[test]
fn clues_lists_every_clue() {
    let (_dir, path) = test_lore();
    spur()
        .args(["clues", "-f"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Rat Nest")
                .and(predicate::str::contains("Chalk Sigils"))
                .and(predicate::str::contains("4 clues")),
        );
}

#[test]
fn clues_filters_by_tag() {
    let (_dir, path) = test_lore();
    spur()
        .args(["clues", "--tag", "mill", "-f"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Miller's Ledger")
                .and(predicate::str::contains("Old Well"))
                .and(predicate::str::contains("Rat Nest").not()),
        );
}

#[test]
fn clues_unknown_tag() {
    let (_dir, path) = test_lore();
    spur()
        .args(["clues", "--tag", "dragons", "-f"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no search tag named"));
}

#[test]
fn missing_lore_file() {
    let dir = TempDir::new().unwrap();
    spur()
        .args(["clues"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read lore.json"));
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[test]
fn show_displays_character_sheet() {
    let (_dir, path) = test_lore();
    spur()
        .args(["show", "mira", "-f"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Mira")
                .and(predicate::str::contains("investigation 2"))
                .and(predicate::str::contains("40 social")),
        );
}

#[test]
fn show_retainer_names_owner() {
    let (_dir, path) = test_lore();
    spur()
        .args(["show", "Pip", "-f"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("retainer of Mira"));
}

#[test]
fn show_fails_unknown_character() {
    let (_dir, path) = test_lore();
    spur()
        .args(["show", "Nobody", "-f"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no character named"));
}

// ---------------------------------------------------------------------------
// exec
// ---------------------------------------------------------------------------

#[test]
fn exec_starts_an_investigation() {
    let (_dir, path) = test_lore();
    spur()
        .args(["exec", "--as", "Mira", "-f"])
        .arg(&path)
        .args([
            "investigate/new",
            "investigate/topic rats",
            "investigate/story I follow the rats down the drain.",
            "investigate/finish",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("> investigate/finish")
                .and(predicate::str::contains("You spend 15 social resources")),
        );

    spur()
        .args(["show", "Mira", "-f"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Investigations")
                .and(predicate::str::contains("rats"))
                .and(predicate::str::contains("active"))
                .and(predicate::str::contains("25 social")),
        );
}

#[test]
fn exec_as_staff_lists_investigations() {
    let (_dir, path) = test_lore();
    start_rats_investigation(&path);
    spur()
        .args(["exec", "-f"])
        .arg(&path)
        .arg("gminvest")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mira").and(predicate::str::contains("rats")));
}

#[test]
fn exec_player_cannot_use_staff_commands() {
    let (_dir, path) = test_lore();
    spur()
        .args(["exec", "--as", "Tobin", "-f"])
        .arg(&path)
        .arg("gminvest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: Only staff may do that."));
}

#[test]
fn exec_unknown_command() {
    let (_dir, path) = test_lore();
    spur()
        .args(["exec", "--as", "Mira", "-f"])
        .arg(&path)
        .arg("dance")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command"));
}

#[test]
fn exec_keeps_lines_before_a_failure() {
    let (_dir, path) = test_lore();
    spur()
        .args(["exec", "--as", "Mira", "-f"])
        .arg(&path)
        .args([
            "investigate/new",
            "investigate/topic rats",
            "investigate/story Down the drain.",
            "investigate/finish",
            "investigate/finish",
        ])
        .assert()
        .failure();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("Down the drain."));
}

// ---------------------------------------------------------------------------
// week
// ---------------------------------------------------------------------------

#[test]
fn week_processes_active_investigations() {
    let (_dir, path) = test_lore();
    start_rats_investigation(&path);
    spur()
        .args(["week", "-f"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Week 1")
                .and(predicate::str::contains("1 investigations processed")),
        );

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"week\": 1"));
}

#[test]
fn week_with_nothing_to_do() {
    let (_dir, path) = test_lore();
    spur()
        .args(["week", "-f"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 investigations processed"));
}

// ---------------------------------------------------------------------------
// inbox
// ---------------------------------------------------------------------------

#[test]
fn inbox_shows_staff_alerts() {
    let (_dir, path) = test_lore();
    start_rats_investigation(&path);
    spur()
        .args(["inbox", "-f"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Mira has started an investigation on rats.",
        ));
}

#[test]
fn inbox_empty_for_character() {
    let (_dir, path) = test_lore();
    spur()
        .args(["inbox", "--for", "Tobin", "-f"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No messages."));
}
