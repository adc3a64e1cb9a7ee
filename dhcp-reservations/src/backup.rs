//! Timestamped backups, restores and atomic writes of the configuration file.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Backup path for `config` taken at `at`: `<config>.<YYYYMMDD-HHMMSS>.bak`.
pub fn backup_path(config: &Path, at: DateTime<Local>) -> PathBuf {
    let mut name = OsString::from(config.as_os_str());
    name.push(format!(".{}.bak", at.format("%Y%m%d-%H%M%S")));
    PathBuf::from(name)
}

/// Copy `config` next to itself under a timestamped name. Backups are never pruned.
pub fn create_backup(config: &Path) -> io::Result<PathBuf> {
    let path = backup_path(config, Local::now());
    fs::copy(config, &path)?;
    tracing::debug!(backup = %path.display(), "Backup created");
    Ok(path)
}

/// Copy `backup` back over `config`.
pub fn restore_backup(config: &Path, backup: &Path) -> io::Result<()> {
    fs::copy(backup, config)?;
    tracing::info!(backup = %backup.display(), "Configuration restored from backup");
    Ok(())
}

/// Replace `config` with `contents` via a temp file in the same directory, so
/// readers never observe a half-written file. Existing permissions are kept.
///
/// A symlinked `config` stays a symlink: the file it points at is replaced.
pub fn persist(config: &Path, contents: &str) -> io::Result<()> {
    let target = fs::canonicalize(config).unwrap_or_else(|_| config.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(contents.as_bytes())?;
    staged.as_file().sync_all()?;
    if let Ok(meta) = fs::metadata(&target) {
        fs::set_permissions(staged.path(), meta.permissions())?;
    }
    staged.persist(&target).map_err(|err| err.error)?;
    if target != config {
        tracing::debug!(link = %config.display(), target = %target.display(), "Wrote through symlink");
    }
    Ok(())
}
