//! Command-layer errors and their exit codes.

use std::io;

use thiserror::Error;

use crate::storage::{ErrorKind, InvalidNameError, StorageError};

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The repository rejected the request or failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Reading the confirmation or writing output failed.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

impl From<InvalidNameError> for CommandError {
    fn from(err: InvalidNameError) -> Self {
        Self::Storage(err.into())
    }
}

impl CommandError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(e) => e.kind(),
            Self::Io(_) => ErrorKind::IoFailure,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::NotFound => 2,
            ErrorKind::AlreadyExists => 3,
            ErrorKind::InvalidArgument => 4,
            ErrorKind::IoFailure => 5,
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
