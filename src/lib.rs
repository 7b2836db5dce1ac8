//! # mendeley-notes
//!
//! Keeps the notes attached to [Mendeley](https://www.mendeley.com) documents in
//! sync with a directory of Markdown files, one file per document, so they can
//! be edited in any text editor and kept under version control.
//!
//! ## What it does
//!
//! Mendeley stores each document's note as a single-line HTML fragment in its
//! SQLite database. `export` renders those notes to Markdown files named
//!
//! ```text
//! {citationKey} ({documentId}) {title}.md
//! ```
//!
//! and `import` reads such a directory back, converts the Markdown to
//! Mendeley's HTML dialect and rewrites the `DocumentNotes` table. Only the
//! `documentId` in the file name is used to find the document again.
//!
//! Import backs up the table first and can be run with `--dry-run` to print
//! the exact cells that would change. There is no conflict detection: import
//! always overwrites the store with the file contents.
//!
//! ## Usage
//!
//! ```sh
//! export MENDELEY_DATABASE_LOC=/path/to/you@example.com@www.mendeley.com.sqlite
//!
//! # Export every non-empty note
//! mendeley-notes export ~/notes/papers
//!
//! # Only the "Thesis" folder, including blank notes
//! mendeley-notes export ~/notes/papers --folder Thesis --blanks
//!
//! # Preview, then apply, an import
//! mendeley-notes import ~/notes/papers --dry-run
//! mendeley-notes import ~/notes/papers
//! ```
//!
//! Close Mendeley Desktop before importing.
pub mod backup;
pub mod config;
pub mod diff;
pub mod error;
pub mod export;
pub mod import;
pub mod join;
pub mod markup;
pub mod naming;
pub mod snapshot;
pub mod store;
