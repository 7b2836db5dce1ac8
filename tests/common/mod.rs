#![allow(dead_code)]

use assert_cmd::Command;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// A minimal Mendeley database: two documents, one folder, one note row each.
pub fn create_store(dir: &Path) -> PathBuf {
    let path = dir.join("mendeley.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE Documents (id INTEGER PRIMARY KEY, title TEXT, citationKey TEXT, note TEXT);
         CREATE TABLE DocumentNotes (id INTEGER PRIMARY KEY, documentId INTEGER, text TEXT, baseNote TEXT);
         CREATE TABLE Folders (id INTEGER PRIMARY KEY, name TEXT);
         CREATE TABLE DocumentFolders (documentId INTEGER, folderId INTEGER);
         INSERT INTO Documents VALUES (7, 'A Study', 'Smith2020', '<p>Hi</p>');
         INSERT INTO Documents VALUES (8, 'Other', 'Doe2019', NULL);
         INSERT INTO Documents VALUES (9, 'Input/Output: a survey', 'Lee2021', 'Some <b>bold</b> claim');
         INSERT INTO DocumentNotes VALUES (1, 7, '<p>Hi</p>', '<p>Hi</p>');
         INSERT INTO DocumentNotes VALUES (2, 8, NULL, NULL);
         INSERT INTO DocumentNotes VALUES (3, 9, 'Some <b>bold</b> claim', 'Some <b>bold</b> claim');
         INSERT INTO Folders VALUES (1, 'Thesis');
         INSERT INTO DocumentFolders VALUES (7, 1);
         INSERT INTO DocumentFolders VALUES (8, 1);",
    )
    .unwrap();
    path
}

/// `(text, baseNote)` for every DocumentNotes row, ordered by documentId.
pub fn read_notes(db: &Path) -> Vec<(i64, Option<String>, Option<String>)> {
    let conn = Connection::open(db).unwrap();
    let mut stmt = conn
        .prepare("SELECT documentId, text, baseNote FROM DocumentNotes ORDER BY documentId")
        .unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

pub fn set_note(db: &Path, document_id: i64, text: &str, base_note: &str) {
    let conn = Connection::open(db).unwrap();
    conn.execute(
        "UPDATE DocumentNotes SET text = ?1, baseNote = ?2 WHERE documentId = ?3",
        rusqlite::params![text, base_note, document_id],
    )
    .unwrap();
}

/// The binary, isolated from the user's environment and config directory.
pub fn notes_cmd(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mendeley-notes").unwrap();
    cmd.env_remove("MENDELEY_DATABASE_LOC");
    cmd.env_remove("RUST_LOG");
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd.env("HOME", config_home);
    cmd
}
