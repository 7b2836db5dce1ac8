//! Pre-import snapshots of `DocumentNotes`, and restoring from them.
//!
//! A backup is a JSON file holding every column and row of the table as it
//! was before an import touched it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::config::RestoreConfig;
use crate::error::{NotesError, Result};
use crate::snapshot::NotesSnapshot;
use crate::store::{NOTES_TABLE, Store};

#[derive(Debug, Serialize, Deserialize)]
struct BackupFile {
    table: String,
    taken_at: DateTime<Utc>,
    #[serde(flatten)]
    snapshot: NotesSnapshot,
}

pub fn backup_file_name(taken_at: DateTime<Utc>) -> String {
    format!(
        "{}.bkp.{}.json",
        NOTES_TABLE,
        taken_at.format("%Y%m%dT%H%M%S%.3fZ")
    )
}

/// Persist `snapshot` under `dir` and return the file's path.
///
/// The file is written under a temporary name and renamed once complete.
pub fn write_backup(snapshot: &NotesSnapshot, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| NotesError::io(dir, e))?;

    let taken_at = Utc::now();
    let path = dir.join(backup_file_name(taken_at));
    let doc = BackupFile {
        table: NOTES_TABLE.to_string(),
        taken_at,
        snapshot: snapshot.clone(),
    };

    let tmp = NamedTempFile::new_in(dir).map_err(|e| NotesError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, &doc)
            .map_err(|e| NotesError::Backup(format!("Failed to serialize backup: {}", e)))?;
        writer.flush().map_err(|e| NotesError::io(tmp.path(), e))?;
    }
    tmp.persist(&path)
        .map_err(|e| NotesError::io(&path, e.error))?;

    info!(path = %path.display(), rows = snapshot.rows.len(), "Wrote backup");
    Ok(path)
}

pub fn read_backup(path: &Path) -> Result<NotesSnapshot> {
    let file = File::open(path).map_err(|e| NotesError::io(path, e))?;
    let doc: BackupFile = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        NotesError::Backup(format!("Failed to parse backup {}: {}", path.display(), e))
    })?;
    if doc.table != NOTES_TABLE {
        return Err(NotesError::Backup(format!(
            "{} is a backup of table {:?}, not {}",
            path.display(),
            doc.table,
            NOTES_TABLE
        )));
    }
    Ok(doc.snapshot)
}

/// Put a backup back in place of the live `DocumentNotes` table.
pub fn restore_notes(config: &RestoreConfig) -> Result<usize> {
    let snapshot = read_backup(&config.backup_file)?;
    let mut store = Store::open(&config.db_path)?;
    store.replace_notes(&snapshot)?;
    Ok(snapshot.rows.len())
}
