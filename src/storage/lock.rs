//! Exclusive repository lock.
//!
//! Repository state has no multi-file transactions, so two invocations
//! interleaving their writes could corrupt it. The lock is an OS-level
//! exclusive lock on `.gitlet/lock`, taken without blocking and released
//! when the guard is dropped.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::storage::error::{StorageError, StorageResult};

/// RAII guard holding the repository lock.
#[derive(Debug)]
pub struct RepoLock {
    path: PathBuf,
    file: File,
}

impl RepoLock {
    /// try to take the lock at `path`
    ///
    /// fails fast with `StorageError::Locked` if another handle holds it
    pub fn acquire(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %path.display(), "acquired repository lock");
                Ok(Self {
                    path: path.to_path_buf(),
                    file,
                })
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(StorageError::Locked(path.to_path_buf()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!(path = %self.path.display(), error = %e, "failed to release repository lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_is_exclusive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lock");

        let lock = RepoLock::acquire(&path).unwrap();
        assert_eq!(lock.path(), path);

        let second = RepoLock::acquire(&path);
        assert!(matches!(second, Err(StorageError::Locked(_))));

        drop(lock);
        RepoLock::acquire(&path).unwrap();
    }
}
