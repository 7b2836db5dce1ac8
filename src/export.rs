use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use tracing::debug;

use crate::config::ExportConfig;
use crate::error::{NotesError, Result};
use crate::join::{NoteRecord, join_notes};
use crate::markup::html_to_markdown;
use crate::naming::encode_file_name;
use crate::store::Store;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub written: usize,
    pub skipped_blank: usize,
}

#[derive(Clone, Copy)]
enum ProcessResult {
    Written,
    Skipped,
}

fn progress_bar(total: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)",
    ) {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar
}

/// Write one Markdown file per note in the store.
///
/// The folder is resolved before anything touches the output directory, so
/// an unknown folder leaves the file system alone. Any write failure ends the run.
pub fn export_notes(config: &ExportConfig) -> Result<ExportStats> {
    let store = Store::open_read_only(&config.db_path)?;
    let notes = join_notes(
        &store.documents()?,
        &store.folders()?,
        &store.document_folders()?,
        config.folder.as_deref(),
    )?;
    drop(store);

    fs::create_dir_all(&config.target_dir).map_err(|e| NotesError::io(&config.target_dir, e))?;

    let pb = progress_bar(notes.len() as u64, config.quiet);
    if !config.quiet {
        pb.println(format!("Found {} notes.", notes.len()));
    }

    let mut stats = ExportStats::default();
    for note in &notes {
        match export_note(note, config, &pb)? {
            ProcessResult::Written => stats.written += 1,
            ProcessResult::Skipped => stats.skipped_blank += 1,
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if !config.quiet {
        eprintln!(
            "Done. {} written, {} blank skipped.",
            stats.written, stats.skipped_blank
        );
    }
    Ok(stats)
}

fn export_note(note: &NoteRecord, config: &ExportConfig, pb: &ProgressBar) -> Result<ProcessResult> {
    let markdown = html_to_markdown(&note.text);
    let file_name = encode_file_name(&note.citation_key, note.document_id, &note.title);

    if !config.blanks && markdown.trim().is_empty() {
        debug!(document_id = note.document_id, "Blank note skipped");
        if config.verbose {
            pb.println(format!("Skipped:  {}", file_name));
        }
        return Ok(ProcessResult::Skipped);
    }

    let path = config.target_dir.join(&file_name);
    fs::write(&path, markdown.as_bytes()).map_err(|e| NotesError::io(&path, e))?;

    debug!(document_id = note.document_id, path = %path.display(), "Wrote note");
    if config.verbose {
        pb.println(format!("Wrote:    {}", file_name));
    }
    Ok(ProcessResult::Written)
}
