//! On-disk layout of a repository and record-level file helpers.
//!
//! ```text
//! <work_dir>/
//!   .gitlet/
//!     HEAD          name of the current branch
//!     STAGING       staging layer (JSON)
//!     lock          OS-level exclusive lock
//!     objects/      <sha256-hex>/<sha256-hex of file name>  raw blob bytes
//!     commits/      <id>.json
//!     branches/     <name>.json
//!     remotes/      <name>  four newline-separated fields
//! ```
//!
//! Every record is written with [`write_atomic`]: the bytes land in a
//! temporary file next to the target which is then renamed over it, so a
//! reader never observes a half-written record.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::storage::error::{StorageError, StorageResult};

/// Paths of every component inside the repository directory.
#[derive(Debug, Clone)]
pub struct RepoLayout {
    work_dir: PathBuf,
    meta_dir: PathBuf,
}

impl RepoLayout {
    pub fn new(work_dir: impl Into<PathBuf>, meta_dir_name: &str) -> Self {
        let work_dir = work_dir.into();
        let meta_dir = work_dir.join(meta_dir_name);
        Self { work_dir, meta_dir }
    }

    /// directory whose files are being versioned
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// the repository marker directory
    pub fn meta_dir(&self) -> &Path {
        &self.meta_dir
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.meta_dir.join("objects")
    }

    pub fn commits_dir(&self) -> PathBuf {
        self.meta_dir.join("commits")
    }

    pub fn branches_dir(&self) -> PathBuf {
        self.meta_dir.join("branches")
    }

    pub fn remotes_dir(&self) -> PathBuf {
        self.meta_dir.join("remotes")
    }

    pub fn head_file(&self) -> PathBuf {
        self.meta_dir.join("HEAD")
    }

    pub fn staging_file(&self) -> PathBuf {
        self.meta_dir.join("STAGING")
    }

    pub fn lock_file(&self) -> PathBuf {
        self.meta_dir.join("lock")
    }

    /// check whether the marker directory exists
    pub fn is_initialized(&self) -> bool {
        self.meta_dir.is_dir()
    }

    /// create the marker directory and all subdirectories
    ///
    /// fails if the marker directory already exists
    pub fn create(&self) -> StorageResult<()> {
        if self.meta_dir.exists() {
            return Err(StorageError::AlreadyInitialized(self.work_dir.clone()));
        }

        fs::create_dir_all(&self.work_dir)?;
        fs::create_dir(&self.meta_dir)?;
        for dir in [
            self.objects_dir(),
            self.commits_dir(),
            self.branches_dir(),
            self.remotes_dir(),
        ] {
            fs::create_dir(dir)?;
        }
        Ok(())
    }

    /// validate that every required directory is present
    pub fn validate(&self) -> StorageResult<()> {
        if !self.is_initialized() {
            return Err(StorageError::NotInitialized(self.work_dir.clone()));
        }

        for dir in [
            self.objects_dir(),
            self.commits_dir(),
            self.branches_dir(),
            self.remotes_dir(),
        ] {
            if !dir.is_dir() {
                return Err(StorageError::CorruptedData {
                    path: dir,
                    reason: "missing required directory".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// write `bytes` to `path` atomically
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let dir = path.parent().ok_or_else(|| StorageError::CorruptedData {
        path: path.to_path_buf(),
        reason: "record path has no parent directory".to_string(),
    })?;
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}

/// serialize `value` as pretty JSON and write it atomically
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> StorageResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &bytes)
}

/// read and deserialize a JSON record
///
/// returns `Ok(None)` if the record does not exist
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let value = serde_json::from_slice(&bytes).map_err(|e| StorageError::CorruptedData {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Some(value))
}
