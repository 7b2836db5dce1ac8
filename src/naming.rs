//! Mapping between a document and its note file name.
//!
//! Files are named `{citationKey} ({documentId}) {title}.md`. Only the
//! parenthesised `documentId` is ever read back; the citation key and title
//! are there for humans browsing the directory.

use crate::error::{NotesError, Result};

pub const NOTE_EXTENSION: &str = "md";

/// Remove the characters that would break the file name on common file systems.
pub fn sanitize_title(title: &str) -> String {
    title.replace('/', "").replace(':', "-")
}

/// Build the file name (with extension) for a document's note.
pub fn encode_file_name(citation_key: &str, document_id: i64, title: &str) -> String {
    format!(
        "{} ({}) {}.{}",
        citation_key,
        document_id,
        sanitize_title(title),
        NOTE_EXTENSION
    )
}

/// Recover the `documentId` from a file base name (extension already stripped).
///
/// The id is the content of the first `(...)` group.
pub fn decode_document_id(stem: &str) -> Result<i64> {
    let malformed = || NotesError::MalformedFileName(stem.to_string());
    let (_, rest) = stem.split_once('(').ok_or_else(malformed)?;
    let (inner, _) = rest.split_once(')').ok_or_else(malformed)?;
    inner.trim().parse::<i64>().map_err(|_| malformed())
}
