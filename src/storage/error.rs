//! Storage layer error types
//!
//! All errors that can occur during repository operations are defined here.
//! Every variant classifies into one of four coarse kinds so callers can
//! decide how to report a failure without matching on every variant.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::types::{BlobRef, BranchName, CommitId, FileName, InvalidNameError, RemoteName};

/// coarse classification of a storage error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// a referenced commit, blob, branch, remote or file does not exist
    NotFound,
    /// a branch/remote name collision, or re-initializing a repository
    AlreadyExists,
    /// the request itself is invalid
    InvalidArgument,
    /// the underlying storage failed or holds unreadable data
    IoFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not found",
            Self::AlreadyExists => "already exists",
            Self::InvalidArgument => "invalid argument",
            Self::IoFailure => "i/o failure",
        };
        f.write_str(s)
    }
}

/// the main error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// the commit was never persisted
    #[error("no commit with id {0} exists")]
    CommitNotFound(CommitId),

    /// a commit references a blob missing from the object store
    #[error("blob not found: {0}")]
    BlobNotFound(BlobRef),

    /// the specified branch was not found
    #[error("no branch with the name {0} exists")]
    BranchNotFound(BranchName),

    /// the specified remote was not found
    #[error("there is no remote named {0}")]
    RemoteNotFound(RemoteName),

    /// the file is absent from the working directory or from a commit
    #[error("file not found: {0}")]
    FileNotFound(FileName),

    /// neither a branch nor a tracked file goes by this name
    #[error("a file or branch named {0} does not exist")]
    NoSuchFileOrBranch(String),

    /// branch already exists
    #[error("a branch with the name {0} already exists")]
    BranchAlreadyExists(BranchName),

    /// remote already exists
    #[error("a remote with the name {0} already exists")]
    RemoteAlreadyExists(RemoteName),

    /// `init` on a directory that already has a repository
    #[error("a repository already exists at {0}")]
    AlreadyInitialized(PathBuf),

    /// repo is not initialized
    #[error("not a repository: {0}")]
    NotInitialized(PathBuf),

    /// commit messages must not be empty
    #[error("a commit must have a non-empty message")]
    EmptyMessage,

    /// deleting the checked-out branch would leave no current branch
    #[error("cannot remove the current branch {0}")]
    CannotRemoveCurrentBranch(BranchName),

    /// `rm` on a file that is neither tracked nor staged
    #[error("{0} is neither tracked nor staged")]
    NotTrackedOrStaged(FileName),

    /// something untracked sits where a restored file has to go
    #[error("cannot restore {file}: {} is in the way", path.display())]
    PathConflict { file: FileName, path: PathBuf },

    /// invalid file, branch or remote name
    #[error("invalid name: {0}")]
    InvalidName(#[from] InvalidNameError),

    /// remote fields are stored one per line
    #[error("remote fields must be single non-empty lines, got {0:?}")]
    InvalidRemoteField(String),

    /// another process holds the repository lock
    #[error("repository at {0} is locked by another process")]
    Locked(PathBuf),

    /// data integrity check failed
    #[error("corrupted data at {path}: {reason}")]
    CorruptedData { path: PathBuf, reason: String },

    /// JSON serialization or deserialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (filesystem level)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CommitNotFound(_)
            | Self::BlobNotFound(_)
            | Self::BranchNotFound(_)
            | Self::RemoteNotFound(_)
            | Self::FileNotFound(_)
            | Self::NoSuchFileOrBranch(_)
            | Self::NotInitialized(_) => ErrorKind::NotFound,
            Self::BranchAlreadyExists(_)
            | Self::RemoteAlreadyExists(_)
            | Self::AlreadyInitialized(_) => ErrorKind::AlreadyExists,
            Self::EmptyMessage
            | Self::CannotRemoveCurrentBranch(_)
            | Self::NotTrackedOrStaged(_)
            | Self::PathConflict { .. }
            | Self::InvalidName(_)
            | Self::InvalidRemoteField(_) => ErrorKind::InvalidArgument,
            Self::Locked(_) | Self::CorruptedData { .. } | Self::Serialization(_) | Self::Io(_) => {
                ErrorKind::IoFailure
            }
        }
    }

    /// check if this error indicates the resource doesn't exist
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// check if this error is a name collision
    pub fn is_already_exists(&self) -> bool {
        self.kind() == ErrorKind::AlreadyExists
    }

    /// check if the request was rejected before touching any state
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }
}

/// result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
