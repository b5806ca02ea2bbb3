//! File-based locking to prevent concurrent batches writing the same tree

use anyhow::{Context, Result};
use fd_lock::{RwLock, RwLockWriteGuard};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LOCK_FILE: &str = ".db-backup.lock";

/// Lock file at the root of a backup directory
///
/// Open it, then hold the guard from `try_acquire` for as long as the batch
/// runs.
pub struct BatchLock {
    lock: RwLock<File>,
    lock_path: PathBuf,
}

impl BatchLock {
    pub fn open(backup_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(backup_dir)
            .context(format!("Failed to create backup directory: {:?}", backup_dir))?;

        let lock_path = backup_dir.join(LOCK_FILE);
        debug!("Opening lock file: {:?}", lock_path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .context(format!("Failed to open lock file: {:?}", lock_path))?;

        Ok(Self {
            lock: RwLock::new(file),
            lock_path,
        })
    }

    /// Take the exclusive lock, failing at once if another batch holds it
    pub fn try_acquire(&mut self) -> Result<RwLockWriteGuard<'_, File>> {
        let guard = self.lock.try_write().context(format!(
            "Another backup batch is already running (lock held: {:?})",
            self.lock_path
        ))?;
        info!("Acquired batch lock: {:?}", self.lock_path);
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}
