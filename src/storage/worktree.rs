//! Working-directory synchronization.
//!
//! Reconciles files on disk with a commit's tracked set. Reverting is a set
//! operation over file names: whatever the previous history, afterwards the
//! tracked files on disk are exactly the target's. Files that neither the
//! current nor the target snapshot tracks are left alone.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::storage::blob::ObjectStore;
use crate::storage::commit::Commit;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{BlobRef, FileName};

/// files touched by a revert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevertSummary {
    pub restored: Vec<FileName>,
    pub deleted: Vec<FileName>,
}

/// The directory being versioned.
pub struct WorkingDirectory {
    root: PathBuf,
}

impl WorkingDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// absolute path of a tracked name
    pub fn path_of(&self, name: &FileName) -> PathBuf {
        self.root.join(name.to_path_buf())
    }

    /// check if `name` exists as a regular file
    pub fn exists(&self, name: &FileName) -> bool {
        self.path_of(name).is_file()
    }

    /// read the current content of `name`
    pub fn read_file(&self, name: &FileName) -> StorageResult<Vec<u8>> {
        let path = self.path_of(name);
        if !path.is_file() {
            return Err(StorageError::FileNotFound(name.clone()));
        }
        Ok(fs::read(path)?)
    }

    /// write a blob's bytes to the file it was recorded for
    ///
    /// overwrites without asking; confirmation is the caller's business
    pub fn pull_file(&self, store: &ObjectStore, blob: &BlobRef) -> StorageResult<()> {
        let bytes = store.get(blob)?;
        let path = self.path_of(&blob.file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        debug!(file = %blob.file_name, "restored file");
        Ok(())
    }

    /// delete `name` from disk if present, pruning directories it empties
    pub fn remove_file(&self, name: &FileName) -> StorageResult<bool> {
        let path = self.path_of(name);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        let mut dir = path.parent();
        while let Some(d) = dir {
            if d == self.root || fs::remove_dir(d).is_err() {
                break;
            }
            dir = d.parent();
        }

        debug!(file = %name, "deleted file");
        Ok(true)
    }

    /// make the tracked files on disk match `target` exactly
    ///
    /// `current` is the tracked set the working directory reflects now.
    /// Every blob and every destination path is checked before anything is
    /// deleted, so a missing object or an untracked entry in the way aborts
    /// the revert with the working directory untouched.
    pub fn revert(
        &self,
        store: &ObjectStore,
        current: &BTreeMap<FileName, BlobRef>,
        target: &Commit,
    ) -> StorageResult<RevertSummary> {
        for blob in target.tracked_files.values() {
            if !store.contains(blob) {
                return Err(StorageError::BlobNotFound(blob.clone()));
            }
        }

        let deleting: BTreeSet<&FileName> = current.keys().filter(|n| !target.tracks(n)).collect();
        for name in target.tracked_files.keys() {
            if let Some(path) = self.obstruction(name, &deleting)? {
                return Err(StorageError::PathConflict {
                    file: name.clone(),
                    path,
                });
            }
        }

        let mut summary = RevertSummary::default();

        for name in current.keys().filter(|n| !target.tracks(n)) {
            if self.remove_file(name)? {
                summary.deleted.push(name.clone());
            }
        }

        for blob in target.tracked_files.values() {
            self.pull_file(store, blob)?;
            summary.restored.push(blob.file_name.clone());
        }

        info!(
            target = %target.id,
            restored = summary.restored.len(),
            deleted = summary.deleted.len(),
            "reverted working directory"
        );
        Ok(summary)
    }

    /// the first path that would stop `name` from being written once
    /// `deleting` is gone
    fn obstruction(&self, name: &FileName, deleting: &BTreeSet<&FileName>) -> StorageResult<Option<PathBuf>> {
        let segments: Vec<&str> = name.as_str().split('/').collect();

        // every parent must be a directory or a file about to be deleted
        for depth in 1..segments.len() {
            let prefix = segments[..depth].join("/");
            let path = self.root.join(&prefix);
            if path.exists() && !path.is_dir() {
                let removed = FileName::new(prefix).map(|p| deleting.contains(&p)).unwrap_or(false);
                return Ok(if removed { None } else { Some(path) });
            }
        }

        let path = self.path_of(name);
        if path.is_dir() && !self.cleared_by(&path, deleting)? {
            return Ok(Some(path));
        }
        Ok(None)
    }

    /// check if deleting `deleting` empties the directory at `dir`
    fn cleared_by(&self, dir: &Path, deleting: &BTreeSet<&FileName>) -> StorageResult<bool> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                if !self.cleared_by(&path, deleting)? {
                    return Ok(false);
                }
                continue;
            }

            let tracked = path
                .strip_prefix(&self.root)
                .ok()
                .and_then(|rel| rel.to_str())
                .and_then(|rel| FileName::new(rel.replace('\\', "/")).ok())
                .is_some_and(|rel| deleting.contains(&rel));
            if !tracked {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
