//! Advisory lease serializing reconciliation cycles.
//!
//! The external mutation API is not transactional, so two overlapping
//! executor runs could interleave moves and violate the tree invariant.
//! One advisory file lock is held for the duration of a cycle (read, diff,
//! guard, execute); a second caller fails fast with
//! [`Error::CycleInProgress`] instead of queueing.

use crate::error::{Error, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Exclusive lease over one reconciliation cycle. Released on drop.
#[derive(Debug)]
pub struct CycleLock {
    file: File,
    path: PathBuf,
}

impl CycleLock {
    /// Acquire the lease, failing fast if another cycle holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                log::debug!("cycle lease acquired at {}", path.display());
                Ok(Self {
                    file,
                    path: path.to_path_buf(),
                })
            }
            Err(_) => Err(Error::CycleInProgress {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CycleLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            log::warn!("failed to release cycle lease: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_acquire_fails_fast() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state").join("cycle.lock");

        let held = CycleLock::acquire(&path).unwrap();
        let err = CycleLock::acquire(&path).unwrap_err();
        assert!(matches!(err, Error::CycleInProgress { .. }));

        drop(held);
        assert!(CycleLock::acquire(&path).is_ok());
    }
}
