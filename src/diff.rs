//! Cell-level comparison of two notes snapshots.
//!
//! Used for the dry-run report and to decide whether a commit is needed, so a
//! dry run always previews exactly what the commit would change.

use serde::Serialize;
use std::fmt::Write;

use crate::error::{NotesError, Result};
use crate::snapshot::{Cell, NotesSnapshot, cells_equal};

/// One cell that differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    /// `documentId` of the row, if that row has an integer one.
    pub document_id: Option<i64>,
    pub column: String,
    pub from: Cell,
    pub to: Cell,
}

/// Compute every differing cell between `before` and `after`.
///
/// Both snapshots must have the same columns and the same number of rows;
/// rows are paired by position. NULL and `""` compare equal.
pub fn diff_snapshots(before: &NotesSnapshot, after: &NotesSnapshot) -> Result<Vec<ChangeRecord>> {
    if before.columns != after.columns {
        return Err(NotesError::SchemaMismatch {
            expected: format!("columns [{}]", before.columns.join(", ")),
            found: format!("columns [{}]", after.columns.join(", ")),
        });
    }
    if before.rows.len() != after.rows.len() {
        return Err(NotesError::SchemaMismatch {
            expected: format!("{} rows", before.rows.len()),
            found: format!("{} rows", after.rows.len()),
        });
    }

    let mut changes = Vec::new();
    for (index, (old_row, new_row)) in before.rows.iter().zip(&after.rows).enumerate() {
        for (column, (old, new)) in before.columns.iter().zip(old_row.iter().zip(new_row)) {
            if !cells_equal(old, new) {
                changes.push(ChangeRecord {
                    document_id: before.document_id(index),
                    column: column.clone(),
                    from: old.clone(),
                    to: new.clone(),
                });
            }
        }
    }
    Ok(changes)
}

/// Human-readable change report; an explicit line when there is nothing to do.
pub fn render_changes(changes: &[ChangeRecord]) -> String {
    if changes.is_empty() {
        return "No changes.\n".to_string();
    }
    let mut out = String::new();
    for change in changes {
        let id = change
            .document_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "?".to_string());
        // Writing to a String cannot fail.
        let _ = writeln!(out, "documentId {} [{}]", id, change.column);
        let _ = writeln!(out, "  - {}", change.from);
        let _ = writeln!(out, "  + {}", change.to);
    }
    let _ = writeln!(out, "{} cell(s) would change.", changes.len());
    out
}
