//! Error types for mendeley-notes.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotesError>;

#[derive(Debug, Error)]
pub enum NotesError {
    /// The store location (or another required setting) is missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "Folder not found: {0:?}. Check the name matches the Mendeley folder name exactly."
    )]
    FolderNotFound(String),

    /// A file in the import directory has no `(documentId)` group in its name.
    #[error("Malformed note file name: {0:?}")]
    MalformedFileName(String),

    #[error("Schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Backup error: {0}")]
    Backup(String),
}

impl NotesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NotesError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            NotesError::Configuration(_) => 2,
            NotesError::FolderNotFound(_) => 3,
            NotesError::SchemaMismatch { .. } => 4,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(NotesError::Configuration("no db".into()).exit_code(), 2);
        assert_eq!(NotesError::FolderNotFound("Reading".into()).exit_code(), 3);
        assert_eq!(
            NotesError::SchemaMismatch {
                expected: "a".into(),
                found: "b".into()
            }
            .exit_code(),
            4
        );
        assert_eq!(NotesError::MalformedFileName("x.md".into()).exit_code(), 1);
    }

    #[test]
    fn test_folder_not_found_message_names_folder() {
        let msg = NotesError::FolderNotFound("Thesis".into()).to_string();
        assert!(msg.contains("\"Thesis\""));
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = NotesError::io(
            "/tmp/out/x.md",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out/x.md"));
        assert!(msg.contains("denied"));
    }
}
