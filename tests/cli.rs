use assert_cmd::Command;
use chrono::{Datelike, Local, NaiveDate};
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn organizer(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("organizer").unwrap();
    cmd.env("NO_COLOR", "1").arg("--data-dir").arg(data_dir);
    cmd
}

#[test]
fn test_contact_add_list_and_persist() {
    let temp_dir = tempfile::tempdir().unwrap();

    organizer(temp_dir.path())
        .args(["contact", "add", "alice", "--phone", "+123456789"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Contact 'Alice' added."));

    organizer(temp_dir.path())
        .args(["contact", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("+123456789"));

    let raw = fs::read_to_string(temp_dir.path().join("contacts.json")).unwrap();
    assert!(raw.contains("\"name\": \"Alice\""));
}

#[test]
fn test_duplicate_contact_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let add = ["contact", "add", "Bob", "--email", "bob@example.com"];

    organizer(temp_dir.path()).args(add).assert().success();
    organizer(temp_dir.path())
        .args(add)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Contact 'Bob' already exists."));

    // Same name with different contact details is a different person.
    organizer(temp_dir.path())
        .args(["contact", "add", "bob", "--email", "other@example.com"])
        .assert()
        .success();
}

#[test]
fn test_invalid_phone_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    organizer(temp_dir.path())
        .args(["contact", "add", "Carl", "--phone", "not a number"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));

    assert!(!temp_dir.path().join("contacts.json").exists());
}

#[test]
fn test_edit_clears_field_with_empty_value() {
    let temp_dir = tempfile::tempdir().unwrap();
    organizer(temp_dir.path())
        .args(["contact", "add", "dana", "--company", "Acme"])
        .assert()
        .success();

    organizer(temp_dir.path())
        .args(["contact", "edit", "DANA", "--company", "", "--last-name", "smith"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dana Smith"));

    organizer(temp_dir.path())
        .args(["contact", "show", "dana"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Company").not());
}

#[test]
fn test_missing_contact_reports_not_found() {
    let temp_dir = tempfile::tempdir().unwrap();
    organizer(temp_dir.path())
        .args(["contact", "delete", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contact 'Nobody' not found."));
}

#[test]
fn test_contact_birthdays_window() {
    let temp_dir = tempfile::tempdir().unwrap();
    let today = Local::now().date_naive();
    let born = NaiveDate::from_ymd_opt(1992, today.month(), today.day()).unwrap();

    organizer(temp_dir.path())
        .args(["contact", "add", "eve", "--birthday"])
        .arg(born.format("%Y-%m-%d").to_string())
        .assert()
        .success();

    organizer(temp_dir.path())
        .args(["contact", "birthdays", "--days", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Eve"));
}

#[test]
fn test_note_lifecycle() {
    let temp_dir = tempfile::tempdir().unwrap();

    organizer(temp_dir.path())
        .args(["note", "add", "Shopping", "--text", "Buy milk", "--tag", "home"])
        .assert()
        .success();
    organizer(temp_dir.path())
        .args(["note", "tag", "Shopping", "errands"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tagged 'Shopping' with 'errands'."));
    organizer(temp_dir.path())
        .args(["note", "untag", "Shopping", "home"])
        .assert()
        .success();

    organizer(temp_dir.path())
        .args(["note", "search", "MILK"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[errands]"));

    organizer(temp_dir.path())
        .args(["note", "edit", "Shopping", "--title", "Groceries"])
        .assert()
        .success();
    organizer(temp_dir.path())
        .args(["note", "show", "Shopping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Note 'Shopping' not found."));
    organizer(temp_dir.path())
        .args(["note", "show", "Groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"));

    organizer(temp_dir.path())
        .args(["note", "delete", "Groceries"])
        .assert()
        .success();
    organizer(temp_dir.path())
        .args(["note", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found."));
}

#[test]
fn test_note_edit_without_changes_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    organizer(temp_dir.path())
        .args(["note", "add", "Idea"])
        .assert()
        .success();
    organizer(temp_dir.path())
        .args(["note", "edit", "Idea"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_sort_key_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    organizer(temp_dir.path())
        .args(["note", "list", "--sort", "unknown_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported sort key"));
}

#[test]
fn test_corrupt_file_is_left_untouched() {
    let temp_dir = tempfile::tempdir().unwrap();
    let contacts = temp_dir.path().join("contacts.json");
    fs::write(&contacts, "garbage").unwrap();

    organizer(temp_dir.path())
        .args(["contact", "add", "Frank"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning:"));

    assert_eq!(fs::read_to_string(&contacts).unwrap(), "garbage");
}

#[test]
fn test_config_set_and_show() {
    let temp_dir = tempfile::tempdir().unwrap();
    organizer(temp_dir.path())
        .args(["config", "birthday-days", "30"])
        .assert()
        .success();
    organizer(temp_dir.path())
        .args(["config", "birthday-days"])
        .assert()
        .success()
        .stdout(predicate::str::contains("birthday-days = 30"));
    organizer(temp_dir.path())
        .args(["config", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_changes_saved_with_autosave_off() {
    let temp_dir = tempfile::tempdir().unwrap();
    organizer(temp_dir.path())
        .args(["config", "autosave", "false"])
        .assert()
        .success();
    organizer(temp_dir.path())
        .args(["note", "add", "Kept"])
        .assert()
        .success();

    organizer(temp_dir.path())
        .args(["note", "show", "Kept"])
        .assert()
        .success();
}

#[test]
fn test_summary_without_command() {
    let temp_dir = tempfile::tempdir().unwrap();
    organizer(temp_dir.path())
        .args(["note", "add", "Only"])
        .assert()
        .success();

    organizer(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Contacts (0)"))
        .stdout(predicate::str::contains("Notes (1)"))
        .stdout(predicate::str::contains("Only"));
}
