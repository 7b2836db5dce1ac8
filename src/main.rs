use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use mendeley_notes::config::{
    self, DB_PATH_ENV, ExportConfig, FileConfig, ImportConfig, RestoreConfig,
};
use mendeley_notes::diff::render_changes;
use mendeley_notes::error::NotesError;
use mendeley_notes::{backup, export, import};
use std::path::PathBuf;
use std::process::ExitCode;

/// Sync Mendeley document notes with a directory of Markdown files.
/// Files are named "{citationKey} ({documentId}) {title}.md".
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Mendeley SQLite database.
    #[arg(long, value_name = "PATH", env = DB_PATH_ENV, global = true)]
    db: Option<PathBuf>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/mendeley-notes/config.toml
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress progress output and diagnostics.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one Markdown file per document note.
    Export {
        /// Directory to write the markdown files to.
        #[arg(value_name = "OUTDIR")]
        outdir: PathBuf,

        /// Only export documents in this Mendeley folder (exact name).
        #[arg(short, long, value_name = "NAME")]
        folder: Option<String>,

        /// Also write files for empty notes.
        #[arg(short, long)]
        blanks: bool,
    },

    /// Read Markdown note files back into the database.
    Import {
        /// Directory containing the markdown notes.
        #[arg(value_name = "NOTES_FOLDER")]
        notes_folder: PathBuf,

        /// Print the changes instead of writing them.
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Do not back up DocumentNotes before importing.
        #[arg(long)]
        no_backup: bool,

        /// Where to write the backup. Defaults to the current directory.
        #[arg(long, value_name = "DIR")]
        backup_dir: Option<PathBuf>,

        /// Print the change list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replace DocumentNotes with the contents of a backup file.
    Restore {
        #[arg(value_name = "BACKUP_FILE")]
        backup_file: PathBuf,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            let code = e
                .chain()
                .find_map(|c| c.downcast_ref::<NotesError>())
                .map_or(1, NotesError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // 1. Load config file (CLI path > default path)
    let file_cfg: FileConfig = config::load_file_config(cli.config.as_deref())?;

    // 2. Resolve db_path (CLI/env > Config)
    let db_path = config::resolve_db_path(cli.db, &file_cfg)?;

    // 3. Run the command
    match cli.command {
        Command::Export {
            outdir,
            folder,
            blanks,
        } => {
            let config = ExportConfig {
                db_path,
                target_dir: outdir,
                folder,
                blanks,
                verbose: cli.verbose > 0,
                quiet: cli.quiet,
            };
            if !config.quiet {
                eprintln!(
                    "Exporting {} to {}{}",
                    config.folder.as_deref().map_or("all notes".to_string(), |f| format!("folder {:?}", f)),
                    config.target_dir.display(),
                    if config.blanks { " (including blank notes)" } else { "" }
                );
            }
            export::export_notes(&config).wrap_err("Export failed")?;
        }

        Command::Import {
            notes_folder,
            dry_run,
            no_backup,
            backup_dir,
            json,
        } => {
            let config = ImportConfig {
                db_path,
                notes_dir: notes_folder,
                backup_dir: (!no_backup).then(|| config::resolve_backup_dir(backup_dir, &file_cfg)),
                dry_run,
            };
            let report = import::import_notes(&config).wrap_err("Import failed")?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report.changes)
                        .wrap_err("Failed to serialize changes")?
                );
            } else if config.dry_run {
                print!("{}", render_changes(&report.changes));
            }

            if !cli.quiet {
                if let Some(path) = &report.backup {
                    eprintln!("Backup written to {}", path.display());
                }
                for path in &report.malformed {
                    eprintln!("Skipped (no documentId in name): {}", path.display());
                }
                for id in &report.unmatched {
                    eprintln!("Skipped (no DocumentNotes row): documentId {}", id);
                }
                let outcome = if config.dry_run {
                    "dry run, nothing written"
                } else if report.committed {
                    "DocumentNotes replaced"
                } else {
                    "no changes, nothing written"
                };
                eprintln!(
                    "Done. {} files read, {} rows updated, {} cells changed ({}).",
                    report.files_read,
                    report.rows_updated,
                    report.changes.len(),
                    outcome
                );
            }
        }

        Command::Restore { backup_file } => {
            let config = RestoreConfig {
                db_path,
                backup_file,
            };
            let rows = backup::restore_notes(&config).wrap_err("Restore failed")?;
            if !cli.quiet {
                eprintln!(
                    "Restored {} rows from {}",
                    rows,
                    config.backup_file.display()
                );
            }
        }
    }

    Ok(())
}
