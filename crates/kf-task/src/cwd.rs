//! Scoped save and restore of the process working directory.

use std::path::{Path, PathBuf};

/// Restores the working directory captured at construction when dropped.
#[derive(Debug)]
#[must_use = "the directory is restored when the guard is dropped"]
pub struct WorkingDirGuard {
    saved: PathBuf,
}

impl WorkingDirGuard {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            saved: std::env::current_dir()?,
        })
    }

    pub fn saved(&self) -> &Path {
        &self.saved
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if let Err(err) = std::env::set_current_dir(&self.saved) {
            tracing::warn!(dir = %self.saved.display(), %err, "could not restore working directory");
        }
    }
}
