//! Assembles one exportable note per document.
//!
//! Notes are taken from `Documents.note`. The legacy `DocumentNotes` table is
//! stale on current Mendeley versions and is only used on the import side.

use std::collections::HashSet;
use tracing::debug;

use crate::error::{NotesError, Result};
use crate::store::{Document, DocumentFolder, Folder};

/// A document joined with its note body. No field is ever NULL here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub document_id: i64,
    pub citation_key: String,
    pub title: String,
    pub text: String,
}

impl From<&Document> for NoteRecord {
    fn from(doc: &Document) -> Self {
        NoteRecord {
            document_id: doc.id,
            citation_key: doc.citation_key.clone().unwrap_or_default(),
            title: doc.title.clone().unwrap_or_default(),
            text: doc.note.clone().unwrap_or_default(),
        }
    }
}

/// Join documents with their notes, restricted to one folder when `folder` is set.
///
/// The folder name must match exactly (case-sensitive).
pub fn join_notes(
    documents: &[Document],
    folders: &[Folder],
    document_folders: &[DocumentFolder],
    folder: Option<&str>,
) -> Result<Vec<NoteRecord>> {
    let members: Option<HashSet<i64>> = match folder {
        None => None,
        Some(name) => {
            let folder_ids: HashSet<i64> = folders
                .iter()
                .filter(|f| f.name.as_deref() == Some(name))
                .map(|f| f.id)
                .collect();
            if folder_ids.is_empty() {
                return Err(NotesError::FolderNotFound(name.to_string()));
            }
            Some(
                document_folders
                    .iter()
                    .filter(|df| folder_ids.contains(&df.folder_id))
                    .map(|df| df.document_id)
                    .collect(),
            )
        }
    };

    let records: Vec<NoteRecord> = documents
        .iter()
        .filter(|doc| members.as_ref().is_none_or(|m| m.contains(&doc.id)))
        .map(NoteRecord::from)
        .collect();

    debug!(
        folder = folder.unwrap_or("<all>"),
        count = records.len(),
        "Joined notes"
    );
    Ok(records)
}
