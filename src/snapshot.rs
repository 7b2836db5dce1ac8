//! In-memory copies of the `DocumentNotes` table.

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NotesError, Result};

pub const DOCUMENT_ID_COLUMN: &str = "documentId";
pub const TEXT_COLUMN: &str = "text";
pub const BASE_NOTE_COLUMN: &str = "baseNote";

/// One SQLite cell, keeping the storage class it was read with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Cell {
    /// NULL and the empty string are the same note.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

/// Cell equality for change detection: exact match, or both empty.
pub fn cells_equal(a: &Cell, b: &Cell) -> bool {
    a == b || (a.is_empty() && b.is_empty())
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Integer(i) => Cell::Integer(i),
            Value::Real(f) => Cell::Real(f),
            Value::Text(s) => Cell::Text(s),
            Value::Blob(b) => Cell::Blob(b),
        }
    }
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            Cell::Null => ValueRef::Null,
            Cell::Integer(i) => ValueRef::Integer(*i),
            Cell::Real(f) => ValueRef::Real(*f),
            Cell::Text(s) => ValueRef::Text(s.as_bytes()),
            Cell::Blob(b) => ValueRef::Blob(b),
        }))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Real(r) => write!(f, "{}", r),
            Cell::Text(s) => write!(f, "{:?}", s),
            Cell::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// A full copy of the notes table: column names plus every row, in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl NotesSnapshot {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| NotesError::SchemaMismatch {
                expected: format!("a `{}` column", name),
                found: format!("columns [{}]", self.columns.join(", ")),
            })
    }

    /// `documentId` of the row at `index`, when it is an integer.
    pub fn document_id(&self, index: usize) -> Option<i64> {
        let col = self.column_index(DOCUMENT_ID_COLUMN)?;
        self.rows.get(index)?.get(col)?.as_integer()
    }

    /// Row indices whose `documentId` equals `document_id`.
    pub fn rows_for_document(&self, document_id: i64) -> Result<Vec<usize>> {
        let col = self.require_column(DOCUMENT_ID_COLUMN)?;
        Ok(self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.get(col).and_then(Cell::as_integer) == Some(document_id))
            .map(|(i, _)| i)
            .collect())
    }

    /// Write `value` into the `text` and `baseNote` cells of one row.
    ///
    /// Both cells always hold the same value afterwards.
    pub fn set_note_body(&mut self, index: usize, value: &str) -> Result<()> {
        let text = self.require_column(TEXT_COLUMN)?;
        let base = self.require_column(BASE_NOTE_COLUMN)?;
        if let Some(row) = self.rows.get_mut(index) {
            row[text] = Cell::Text(value.to_string());
            row[base] = Cell::Text(value.to_string());
        }
        Ok(())
    }

    pub fn cell(&self, index: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(index)?.get(col)
    }
}
