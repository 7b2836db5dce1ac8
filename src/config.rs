use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NotesError, Result};

pub const DB_PATH_ENV: &str = "MENDELEY_DATABASE_LOC";

/// Settings for one export run.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub db_path: PathBuf,
    pub target_dir: PathBuf,
    /// Only export documents in this Mendeley folder.
    pub folder: Option<String>,
    /// Also write files for notes that render to blank Markdown.
    pub blanks: bool,
    pub verbose: bool,
    pub quiet: bool,
}

/// Settings for one import run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub db_path: PathBuf,
    pub notes_dir: PathBuf,
    /// Where the pre-import snapshot goes; `None` disables the backup.
    pub backup_dir: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct RestoreConfig {
    pub db_path: PathBuf,
    pub backup_file: PathBuf,
}

/// Contents of `config.toml`.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    pub db_path: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mendeley-notes/config.toml"))
}

/// Load the config file: the explicit path if given (must exist), else the
/// default location if present, else an empty config.
pub fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit_path {
        Some(p) => {
            if !p.exists() {
                return Err(NotesError::Configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            Some(p.to_path_buf())
        }
        None => default_config_path().filter(|p| p.exists()),
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p).map_err(|e| NotesError::io(&p, e))?;
            toml::from_str(&content).map_err(|e| {
                NotesError::Configuration(format!("Failed to parse config {}: {}", p.display(), e))
            })
        }
    }
}

/// Pick the database path (CLI/env > config file) and check it exists.
pub fn resolve_db_path(cli: Option<PathBuf>, file_cfg: &FileConfig) -> Result<PathBuf> {
    let db_path = cli.or_else(|| file_cfg.db_path.clone()).ok_or_else(|| {
        NotesError::Configuration(format!(
            "Could not determine the Mendeley database path.\n\
             Use --db, set {} to the path of the Mendeley sqlite database, \
             or set db_path in config.toml.",
            DB_PATH_ENV
        ))
    })?;

    if !db_path.exists() {
        return Err(NotesError::Configuration(format!(
            "Database not found at: {}",
            db_path.display()
        )));
    }
    Ok(db_path)
}

/// Backup directory: CLI > config file > current directory.
pub fn resolve_backup_dir(cli: Option<PathBuf>, file_cfg: &FileConfig) -> PathBuf {
    cli.or_else(|| file_cfg.backup_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}
