//! Commit records and history traversal.
//!
//! A commit is an immutable snapshot: the tracked set (file name → blob),
//! a message, a timestamp and the id of its single parent. Commits are
//! persisted once under their integer id and never rewritten. Parents are
//! always re-resolved through the store by id, so the graph on disk is the
//! only source of truth.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::layout::{read_json, write_json};
use crate::storage::types::{BlobRef, CommitId, FileName};

/// message of the root commit created by `init`
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// a persisted snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: CommitId,
    /// `None` only for the root commit
    pub parent_id: Option<CommitId>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub tracked_files: BTreeMap<FileName, BlobRef>,
}

impl Commit {
    /// create the root commit
    pub fn root() -> Self {
        Self {
            id: CommitId::ROOT,
            parent_id: None,
            message: INITIAL_COMMIT_MESSAGE.to_string(),
            timestamp: Utc::now(),
            tracked_files: BTreeMap::new(),
        }
    }

    /// create a commit on top of `parent`
    pub fn new(
        id: CommitId,
        parent: CommitId,
        message: impl Into<String>,
        tracked_files: BTreeMap<FileName, BlobRef>,
    ) -> Self {
        Self {
            id,
            parent_id: Some(parent),
            message: message.into(),
            timestamp: Utc::now(),
            tracked_files,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// check if the commit tracks `name`
    pub fn tracks(&self, name: &FileName) -> bool {
        self.tracked_files.contains_key(name)
    }

    /// the blob recorded for `name` in this commit
    pub fn get_object(&self, name: &FileName) -> StorageResult<&BlobRef> {
        self.tracked_files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.clone()))
    }

    /// first line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or(&self.message)
    }
}

/// Persists commits under `.gitlet/commits/<id>.json`.
pub struct CommitStore {
    dir: PathBuf,
}

impl CommitStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_of(&self, id: CommitId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// persist a commit
    ///
    /// commits are write-once; storing an id twice is refused
    pub fn store(&self, commit: &Commit) -> StorageResult<()> {
        let path = self.path_of(commit.id);
        if path.exists() {
            return Err(StorageError::CorruptedData {
                path,
                reason: format!("commit {} is already persisted", commit.id),
            });
        }

        if let Some(parent) = commit.parent_id {
            if !self.exists(parent) {
                return Err(StorageError::CommitNotFound(parent));
            }
        }

        write_json(&path, commit)?;
        debug!(id = %commit.id, files = commit.tracked_files.len(), "persisted commit");
        Ok(())
    }

    /// load a commit by id
    pub fn load(&self, id: CommitId) -> StorageResult<Commit> {
        let path = self.path_of(id);
        let commit: Commit = read_json(&path)?.ok_or(StorageError::CommitNotFound(id))?;

        if commit.id != id {
            return Err(StorageError::CorruptedData {
                path,
                reason: format!("record holds commit {} instead of {}", commit.id, id),
            });
        }
        Ok(commit)
    }

    /// check if a commit was ever persisted
    pub fn exists(&self, id: CommitId) -> bool {
        self.path_of(id).is_file()
    }

    /// all persisted commit ids in ascending (creation) order
    pub fn ids(&self) -> StorageResult<Vec<CommitId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(stem) = file_name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if let Ok(id) = stem.parse::<CommitId>() {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// the id the next commit will receive
    pub fn next_id(&self) -> StorageResult<CommitId> {
        Ok(self
            .ids()?
            .last()
            .map(CommitId::next)
            .unwrap_or(CommitId::ROOT))
    }

    /// walk history from `start` back to the root
    pub fn history(&self, start: CommitId) -> History<'_> {
        History {
            store: self,
            next: Some(start),
            seen: HashSet::new(),
        }
    }
}

/// iterator over a commit and its ancestors, newest first
pub struct History<'a> {
    store: &'a CommitStore,
    next: Option<CommitId>,
    seen: HashSet<CommitId>,
}

impl Iterator for History<'_> {
    type Item = StorageResult<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;

        if !self.seen.insert(id) {
            return Some(Err(StorageError::CorruptedData {
                path: self.store.path_of(id),
                reason: format!("commit {} appears twice in its own ancestry", id),
            }));
        }

        match self.store.load(id) {
            Ok(commit) => {
                self.next = commit.parent_id;
                Some(Ok(commit))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
