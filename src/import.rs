//! Reading a directory of note files back into `DocumentNotes`.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backup::write_backup;
use crate::config::ImportConfig;
use crate::diff::{ChangeRecord, diff_snapshots};
use crate::error::{NotesError, Result};
use crate::markup::markdown_to_html;
use crate::naming::{NOTE_EXTENSION, decode_document_id};
use crate::snapshot::{NotesSnapshot, TEXT_COLUMN};
use crate::store::Store;

/// A Markdown file whose name carried a valid `documentId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
    pub document_id: i64,
    pub path: PathBuf,
    pub markdown: String,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub files_read: usize,
    pub rows_updated: usize,
    /// Files skipped because their name had no `(documentId)`.
    pub malformed: Vec<PathBuf>,
    /// Document ids with a file but no `DocumentNotes` row.
    pub unmatched: Vec<i64>,
    pub changes: Vec<ChangeRecord>,
    pub backup: Option<PathBuf>,
    pub committed: bool,
}

/// List the `*.md` files directly inside `dir`, in file-name order.
fn list_note_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| NotesError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| NotesError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == NOTE_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read every note file in `dir`. Badly named files are returned separately
/// instead of failing the whole read.
pub fn read_note_files(dir: &Path) -> Result<(Vec<NoteFile>, Vec<PathBuf>)> {
    let mut files = Vec::new();
    let mut malformed = Vec::new();

    for path in list_note_paths(dir)? {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let document_id = match decode_document_id(&stem) {
            Ok(id) => id,
            Err(e) => {
                warn!(path = %path.display(), "{}; skipping", e);
                malformed.push(path);
                continue;
            }
        };
        let markdown = fs::read_to_string(&path).map_err(|e| NotesError::io(&path, e))?;
        files.push(NoteFile {
            document_id,
            path,
            markdown,
        });
    }
    Ok((files, malformed))
}

/// Result of merging note files into a snapshot.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Row indices whose note body came from a file.
    pub touched: BTreeSet<usize>,
    pub unmatched: Vec<i64>,
}

/// Merge `files` into `snapshot` and convert the touched rows to HTML.
///
/// Files are applied in order, so a later file for the same document wins.
/// Rows without a file are left exactly as they were.
pub fn apply_note_files(snapshot: &mut NotesSnapshot, files: &[NoteFile]) -> Result<ApplyOutcome> {
    let mut outcome = ApplyOutcome::default();

    for file in files {
        let rows = snapshot.rows_for_document(file.document_id)?;
        if rows.is_empty() {
            warn!(
                document_id = file.document_id,
                path = %file.path.display(),
                "No DocumentNotes row for this document; skipping"
            );
            outcome.unmatched.push(file.document_id);
            continue;
        }
        for index in rows {
            snapshot.set_note_body(index, &file.markdown)?;
            outcome.touched.insert(index);
        }
    }

    for &index in &outcome.touched {
        let markdown = snapshot
            .cell(index, TEXT_COLUMN)
            .and_then(|c| c.as_text())
            .unwrap_or_default()
            .to_string();
        snapshot.set_note_body(index, &markdown_to_html(&markdown))?;
    }

    debug!(
        touched = outcome.touched.len(),
        unmatched = outcome.unmatched.len(),
        "Applied note files"
    );
    Ok(outcome)
}

/// Import every note file in `config.notes_dir` into the store.
///
/// The backup (when enabled) is written before anything else can change. A
/// dry run stops after computing the changes. Otherwise the table is
/// replaced as a whole, unless nothing changed.
pub fn import_notes(config: &ImportConfig) -> Result<ImportReport> {
    let mut store = Store::open(&config.db_path)?;
    let before = store.notes_snapshot()?;

    let (files, malformed) = read_note_files(&config.notes_dir)?;
    let mut after = before.clone();
    let outcome = apply_note_files(&mut after, &files)?;

    let mut report = ImportReport {
        files_read: files.len(),
        rows_updated: outcome.touched.len(),
        malformed,
        unmatched: outcome.unmatched,
        ..ImportReport::default()
    };

    if let Some(dir) = &config.backup_dir {
        report.backup = Some(write_backup(&before, dir)?);
    }

    report.changes = diff_snapshots(&before, &after)?;

    if config.dry_run {
        info!(changes = report.changes.len(), "Dry run; store left untouched");
        return Ok(report);
    }

    if report.changes.is_empty() {
        info!("No changes; store left untouched");
        return Ok(report);
    }

    store.replace_notes(&after)?;
    report.committed = true;
    Ok(report)
}
