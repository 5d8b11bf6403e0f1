//!  Branch management.
//!
//!  Branches are named pointers to commit ids. This module handles:
//! - branch records under `.gitlet/branches/<name>.json`
//! - the current-branch record (`.gitlet/HEAD`)
//! - head resolution and head moves
//!
//! The registry only ever stores commit ids, never commit content.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::layout::{read_json, write_atomic, write_json};
use crate::storage::types::{BranchName, CommitId};

/// a named pointer to a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: BranchName,
    pub head_commit_id: CommitId,
}

impl Branch {
    pub fn new(name: BranchName, head_commit_id: CommitId) -> Self {
        Self {
            name,
            head_commit_id,
        }
    }
}

/// Manages branch records and the current-branch pointer.
pub struct BranchRegistry {
    dir: PathBuf,
    head_file: PathBuf,
}

impl BranchRegistry {
    pub fn new(dir: impl Into<PathBuf>, head_file: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            head_file: head_file.into(),
        }
    }

    fn path_of(&self, name: &BranchName) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// persist a branch record
    ///
    /// the caller checks `branch_exists` first; this overwrites
    pub fn cache_branch(&self, branch: &Branch) -> StorageResult<()> {
        write_json(&self.path_of(&branch.name), branch)?;
        debug!(branch = %branch.name, head = %branch.head_commit_id, "stored branch");
        Ok(())
    }

    /// check if a branch exists
    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.path_of(name).is_file()
    }

    /// load a branch record
    pub fn load_branch(&self, name: &BranchName) -> StorageResult<Branch> {
        let path = self.path_of(name);
        let branch: Branch =
            read_json(&path)?.ok_or_else(|| StorageError::BranchNotFound(name.clone()))?;

        if &branch.name != name {
            return Err(StorageError::CorruptedData {
                path,
                reason: format!("record holds branch {} instead of {}", branch.name, name),
            });
        }
        Ok(branch)
    }

    /// resolve a branch name to its head commit id
    pub fn resolve_branch(&self, name: &BranchName) -> StorageResult<CommitId> {
        Ok(self.load_branch(name)?.head_commit_id)
    }

    /// move a branch to point to a new commit
    pub fn update_branch(&self, name: &BranchName, target: CommitId) -> StorageResult<()> {
        let mut branch = self.load_branch(name)?;
        branch.head_commit_id = target;
        self.cache_branch(&branch)
    }

    /// the name of the current branch
    pub fn current_branch(&self) -> StorageResult<BranchName> {
        let raw = match fs::read_to_string(&self.head_file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::CorruptedData {
                    path: self.head_file.clone(),
                    reason: "no current branch recorded".to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        BranchName::new(raw.trim()).map_err(|e| StorageError::CorruptedData {
            path: self.head_file.clone(),
            reason: e.to_string(),
        })
    }

    /// make `name` the current branch
    pub fn set_current_branch(&self, name: &BranchName) -> StorageResult<()> {
        if !self.branch_exists(name) {
            return Err(StorageError::BranchNotFound(name.clone()));
        }
        write_atomic(&self.head_file, name.as_str().as_bytes())?;
        debug!(branch = %name, "switched current branch");
        Ok(())
    }

    /// head commit id of the current branch
    pub fn id_of_head_commit(&self) -> StorageResult<CommitId> {
        self.resolve_branch(&self.current_branch()?)
    }

    /// delete a branch record
    ///
    /// the current branch can't be deleted: the repository would be left
    /// without a current branch
    pub fn delete_branch(&self, name: &BranchName) -> StorageResult<()> {
        if !self.branch_exists(name) {
            return Err(StorageError::BranchNotFound(name.clone()));
        }

        if &self.current_branch()? == name {
            return Err(StorageError::CannotRemoveCurrentBranch(name.clone()));
        }

        fs::remove_file(self.path_of(name))?;
        debug!(branch = %name, "deleted branch");
        Ok(())
    }

    /// all branch names, sorted
    pub fn branch_names(&self) -> StorageResult<Vec<BranchName>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(stem) = file_name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if let Ok(name) = BranchName::new(stem) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
