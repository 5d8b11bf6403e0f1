//! Repository configuration.

use std::path::PathBuf;

use crate::storage::BranchName;

/// Options for opening or creating a repository.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Directory whose files are versioned.
    pub work_dir: PathBuf,
    /// Name of the repository marker directory inside `work_dir`.
    pub meta_dir_name: String,
    /// Branch created by `init`.
    pub default_branch: BranchName,
    /// Take the exclusive repository lock while the handle is open.
    pub acquire_lock: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            meta_dir_name: ".gitlet".into(),
            default_branch: BranchName::master(),
            acquire_lock: true,
        }
    }
}

impl RepositoryConfig {
    /// Create a new configuration for the given working directory.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Default::default()
        }
    }

    /// Set the marker directory name.
    pub fn meta_dir_name(mut self, value: impl Into<String>) -> Self {
        self.meta_dir_name = value.into();
        self
    }

    /// Set the branch created by `init`.
    pub fn default_branch(mut self, value: BranchName) -> Self {
        self.default_branch = value;
        self
    }

    /// Set acquire_lock flag.
    pub fn acquire_lock(mut self, value: bool) -> Self {
        self.acquire_lock = value;
        self
    }
}
