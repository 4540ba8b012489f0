//! Database backups taken before ingestion.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::storage::PostingStore;

/// Result of a backup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// A consistent copy was written here
    Created(PathBuf),
    /// The store has no backing file (in-memory)
    NothingToBackup,
}

impl std::fmt::Display for BackupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created(path) => write!(f, "Database backup created at {}", path.display()),
            Self::NothingToBackup => f.write_str("No database to backup"),
        }
    }
}

/// Write a snapshot of the store into `backup_dir`.
///
/// The copy is produced with `VACUUM INTO`, so it is consistent even while
/// the store is open.
pub fn backup_database(store: &PostingStore, backup_dir: &Path) -> Result<BackupOutcome> {
    let Some(db_path) = store.path() else {
        return Ok(BackupOutcome::NothingToBackup);
    };

    if !backup_dir.as_os_str().is_empty() {
        fs::create_dir_all(backup_dir)?;
    }
    let target = backup_path(db_path, backup_dir, Local::now());

    let target_str = target.to_string_lossy().into_owned();
    store
        .connection()
        .execute("VACUUM INTO ?1", rusqlite::params![target_str])?;

    log::info!("Backed up {} to {}", db_path.display(), target.display());
    Ok(BackupOutcome::Created(target))
}

/// `<dir>/<stem>-<YYYYmmdd-HHMMSS>.db`, with a counter appended when that
/// name is already taken.
fn backup_path(db_path: &Path, backup_dir: &Path, now: DateTime<Local>) -> PathBuf {
    let stem = db_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "postings".to_string());
    let stamp = now.format("%Y%m%d-%H%M%S");

    let mut candidate = backup_dir.join(format!("{stem}-{stamp}.db"));
    let mut n = 1;
    while candidate.exists() {
        candidate = backup_dir.join(format!("{stem}-{stamp}-{n}.db"));
        n += 1;
    }
    candidate
}
