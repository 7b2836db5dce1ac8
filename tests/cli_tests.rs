//! End-to-end tests of the binary.

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{create_store, notes_cmd, read_notes, set_note};

#[test]
fn test_missing_database_location_fails_before_any_io() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    notes_cmd(temp.path())
        .arg("export")
        .arg(&out)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("MENDELEY_DATABASE_LOC"));

    assert!(!out.exists());
}

#[test]
fn test_database_location_from_environment() {
    let temp = TempDir::new().unwrap();
    let db = create_store(temp.path());
    let out = temp.path().join("out");

    notes_cmd(temp.path())
        .env("MENDELEY_DATABASE_LOC", &db)
        .arg("export")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("Smith2020 (7) A Study.md").exists());
}

#[test]
fn test_database_location_from_config_file() {
    let temp = TempDir::new().unwrap();
    let db = create_store(temp.path());
    let cfg_dir = temp.path().join("mendeley-notes");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("config.toml"),
        format!("db_path = {:?}\n", db.display().to_string()),
    )
    .unwrap();
    let out = temp.path().join("out");

    notes_cmd(temp.path())
        .arg("export")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("Smith2020 (7) A Study.md").exists());
}

#[test]
fn test_export_unknown_folder_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let db = create_store(temp.path());
    let out = temp.path().join("out");

    notes_cmd(temp.path())
        .arg("--db")
        .arg(&db)
        .arg("export")
        .arg(&out)
        .arg("--folder")
        .arg("Nope")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Folder not found"));

    assert!(!out.exists());
}

#[test]
fn test_export_blanks_flag() {
    let temp = TempDir::new().unwrap();
    let db = create_store(temp.path());
    let out = temp.path().join("out");

    notes_cmd(temp.path())
        .arg("--db")
        .arg(&db)
        .arg("export")
        .arg(&out)
        .arg("--blanks")
        .assert()
        .success()
        .stderr(predicate::str::contains("3 written"));

    assert!(out.join("Doe2019 (8) Other.md").exists());
}

#[test]
fn test_import_dry_run_prints_changes() {
    let temp = TempDir::new().unwrap();
    let db = create_store(temp.path());
    let notes = temp.path().join("notes");
    fs::create_dir_all(&notes).unwrap();
    fs::write(notes.join("Smith2020 (7) A Study.md"), "Hello world").unwrap();
    let before = read_notes(&db);

    notes_cmd(temp.path())
        .current_dir(temp.path())
        .arg("--db")
        .arg(&db)
        .arg("import")
        .arg(&notes)
        .arg("--dry-run")
        .arg("--no-backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("documentId 7 [text]"))
        .stdout(predicate::str::contains("+ \"Hello world\""));

    assert_eq!(read_notes(&db), before);
}

#[test]
fn test_import_dry_run_without_changes_says_so() {
    let temp = TempDir::new().unwrap();
    let db = create_store(temp.path());
    set_note(&db, 7, "Hello world", "Hello world");
    let notes = temp.path().join("notes");
    fs::create_dir_all(&notes).unwrap();
    fs::write(notes.join("Smith2020 (7) A Study.md"), "Hello world").unwrap();

    notes_cmd(temp.path())
        .arg("--db")
        .arg(&db)
        .arg("import")
        .arg(&notes)
        .arg("--dry-run")
        .arg("--no-backup")
        .assert()
        .success()
        .stdout(predicate::eq("No changes.\n"));
}

#[test]
fn test_import_json_output() {
    let temp = TempDir::new().unwrap();
    let db = create_store(temp.path());
    let notes = temp.path().join("notes");
    fs::create_dir_all(&notes).unwrap();
    fs::write(notes.join("Smith2020 (7) A Study.md"), "Hello world").unwrap();

    let output = notes_cmd(temp.path())
        .arg("--db")
        .arg(&db)
        .arg("import")
        .arg(&notes)
        .arg("--dry-run")
        .arg("--no-backup")
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let changes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let changes = changes.as_array().unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0]["document_id"], 7);
    assert_eq!(changes[0]["column"], "text");
    assert_eq!(changes[0]["to"], "Hello world");
}

#[test]
fn test_import_then_restore_from_backup() {
    let temp = TempDir::new().unwrap();
    let db = create_store(temp.path());
    let before = read_notes(&db);
    let notes = temp.path().join("notes");
    fs::create_dir_all(&notes).unwrap();
    fs::write(notes.join("Smith2020 (7) A Study.md"), "Hello world").unwrap();
    let backups = temp.path().join("backups");

    notes_cmd(temp.path())
        .arg("--db")
        .arg(&db)
        .arg("import")
        .arg(&notes)
        .arg("--backup-dir")
        .arg(&backups)
        .assert()
        .success()
        .stderr(predicate::str::contains("Backup written to"));

    assert_eq!(read_notes(&db)[0].1.as_deref(), Some("Hello world"));

    let backup = fs::read_dir(&backups)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();

    notes_cmd(temp.path())
        .arg("--db")
        .arg(&db)
        .arg("restore")
        .arg(&backup)
        .assert()
        .success();

    assert_eq!(read_notes(&db), before);
}

#[test]
fn test_import_backup_defaults_to_current_directory() {
    let temp = TempDir::new().unwrap();
    let db = create_store(temp.path());
    let notes = temp.path().join("notes");
    fs::create_dir_all(&notes).unwrap();
    let work = temp.path().join("work");
    fs::create_dir_all(&work).unwrap();

    notes_cmd(temp.path())
        .current_dir(&work)
        .arg("--db")
        .arg(&db)
        .arg("import")
        .arg(&notes)
        .assert()
        .success();

    let names: Vec<String> = fs::read_dir(&work)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("DocumentNotes.bkp."));
}
