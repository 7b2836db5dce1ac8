//! Access to the Mendeley SQLite database.
//!
//! Tables read:
//! ```sql
//! Documents       (id, title, citationKey, note, ...)
//! DocumentNotes   (id, documentId, text, baseNote, ...)
//! Folders         (id, name, ...)
//! DocumentFolders (documentId, folderId, ...)
//! ```
//! `DocumentNotes` is the only table ever written, and only as a whole.

use rusqlite::{Connection, OpenFlags, params_from_iter, types::Value};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{NotesError, Result};
use crate::snapshot::{Cell, NotesSnapshot};

pub const NOTES_TABLE: &str = "DocumentNotes";

/// Row of `Documents`. The HTML note body lives in `note`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: i64,
    pub title: Option<String>,
    pub citation_key: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentFolder {
    pub document_id: i64,
    pub folder_id: i64,
}

pub struct Store {
    conn: Connection,
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl Store {
    /// Open the database without write access.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), "Opened store read-only");
        Ok(Self { conn })
    }

    /// Open an existing database for reading and writing. Never creates one.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), "Opened store read-write");
        Ok(Self { conn })
    }

    pub fn documents(&self) -> Result<Vec<Document>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, citationKey, note FROM Documents ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Document {
                id: row.get(0)?,
                title: row.get(1)?,
                citation_key: row.get(2)?,
                note: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn folders(&self) -> Result<Vec<Folder>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM Folders")?;
        let rows = stmt.query_map([], |row| {
            Ok(Folder {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn document_folders(&self) -> Result<Vec<DocumentFolder>> {
        let mut stmt = self
            .conn
            .prepare("SELECT documentId, folderId FROM DocumentFolders")?;
        let rows = stmt.query_map([], |row| {
            Ok(DocumentFolder {
                document_id: row.get(0)?,
                folder_id: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn notes_columns(&self) -> Result<Vec<String>> {
        let stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} LIMIT 0", quote_ident(NOTES_TABLE)))?;
        Ok(stmt.column_names().into_iter().map(String::from).collect())
    }

    /// Read every row and column of `DocumentNotes`.
    pub fn notes_snapshot(&self) -> Result<NotesSnapshot> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY rowid",
            quote_ident(NOTES_TABLE)
        ))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt.query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i).map(Cell::from))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?;
        let rows = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(rows = rows.len(), columns = width, "Read notes snapshot");
        Ok(NotesSnapshot::new(columns, rows))
    }

    /// Replace the whole contents of `DocumentNotes` with `snapshot`.
    ///
    /// The table keeps its declared schema; the swap happens in one transaction.
    pub fn replace_notes(&mut self, snapshot: &NotesSnapshot) -> Result<()> {
        let live = self.notes_columns()?;
        if live != snapshot.columns {
            return Err(NotesError::SchemaMismatch {
                expected: format!("columns [{}]", live.join(", ")),
                found: format!("columns [{}]", snapshot.columns.join(", ")),
            });
        }

        let table = quote_ident(NOTES_TABLE);
        let column_list = snapshot
            .columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=snapshot.columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DELETE FROM {}", table), [])?;
        {
            let mut insert = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table, column_list, placeholders
            ))?;
            for row in &snapshot.rows {
                insert.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;
        info!(rows = snapshot.rows.len(), "Replaced {}", NOTES_TABLE);
        Ok(())
    }
}
