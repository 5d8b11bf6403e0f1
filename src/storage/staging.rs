//! The staging layer: the mutable, not-yet-committed state layered on top
//! of the checked-out commit.
//!
//! The staging area is a plain value. Every operation that needs to know
//! what the parent commit tracks takes that commit as an argument instead
//! of reaching for ambient state, so all of this is testable without a
//! filesystem.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::storage::commit::Commit;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{BlobRef, CommitId, FileName};

/// what `mark_for_removal` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// the file was committed in the parent; it is dropped at the next commit
    Marked,
    /// the file was only staged; it was simply unstaged
    Unstaged,
}

/// staging layer state, persisted as `.gitlet/STAGING`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingArea {
    parent_id: CommitId,
    /// what the next commit will track
    tracked_files: BTreeMap<FileName, BlobRef>,
    /// names whose entry differs from the parent's
    staged_files: BTreeSet<FileName>,
    /// names tracked by the parent that the next commit drops
    removed_files: BTreeSet<FileName>,
}

impl StagingArea {
    /// a clean staging layer mirroring `commit`
    pub fn derive_from(commit: &Commit) -> Self {
        Self {
            parent_id: commit.id,
            tracked_files: commit.tracked_files.clone(),
            staged_files: BTreeSet::new(),
            removed_files: BTreeSet::new(),
        }
    }

    /// the commit this layer sits on
    pub fn parent_id(&self) -> CommitId {
        self.parent_id
    }

    pub fn tracked_files(&self) -> &BTreeMap<FileName, BlobRef> {
        &self.tracked_files
    }

    pub fn staged_files(&self) -> &BTreeSet<FileName> {
        &self.staged_files
    }

    pub fn removed_files(&self) -> &BTreeSet<FileName> {
        &self.removed_files
    }

    pub fn tracks(&self, name: &FileName) -> bool {
        self.tracked_files.contains_key(name)
    }

    /// check if committing now would differ from the parent
    pub fn has_changes(&self) -> bool {
        !self.staged_files.is_empty() || !self.removed_files.is_empty()
    }

    /// record `blob` as the next content of its file
    ///
    /// clears any pending removal mark. Returns `true` if the tracked set
    /// changed.
    pub fn stage(&mut self, blob: BlobRef, parent: &Commit) -> bool {
        let name = blob.file_name.clone();
        self.removed_files.remove(&name);

        if parent.tracked_files.get(&name) == Some(&blob) {
            self.staged_files.remove(&name);
        } else {
            self.staged_files.insert(name.clone());
        }

        self.tracked_files.insert(name, blob.clone()) != Some(blob)
    }

    /// drop `name` from the next commit
    ///
    /// fails if the name is neither tracked nor staged
    pub fn mark_for_removal(&mut self, name: &FileName, parent: &Commit) -> StorageResult<Removal> {
        if self.tracked_files.remove(name).is_none() {
            return Err(StorageError::NotTrackedOrStaged(name.clone()));
        }
        self.staged_files.remove(name);

        if parent.tracks(name) {
            self.removed_files.insert(name.clone());
            Ok(Removal::Marked)
        } else {
            Ok(Removal::Unstaged)
        }
    }

    /// turn the staged state into a commit with id `id`
    ///
    /// the staging layer itself is left untouched; the caller re-derives it
    /// from the returned commit once that commit is persisted
    pub fn freeze(&self, id: CommitId, message: &str) -> StorageResult<Commit> {
        if message.trim().is_empty() {
            return Err(StorageError::EmptyMessage);
        }

        let tracked = self
            .tracked_files
            .iter()
            .filter(|(name, _)| !self.removed_files.contains(*name))
            .map(|(name, blob)| (name.clone(), blob.clone()))
            .collect();

        Ok(Commit::new(id, self.parent_id, message, tracked))
    }
}
