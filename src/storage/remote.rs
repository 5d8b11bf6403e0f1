//! Remote metadata records.
//!
//! A remote is a flat `{name, user, server, path}` record kept under
//! `.gitlet/remotes/<name>` as four newline-separated fields. Nothing here
//! talks to the network.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::layout::write_atomic;
use crate::storage::types::RemoteName;

/// a remote repository location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: RemoteName,
    pub user_name: String,
    pub server: String,
    pub path: String,
}

impl Remote {
    pub fn new(
        name: RemoteName,
        user_name: impl Into<String>,
        server: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name,
            user_name: user_name.into(),
            server: server.into(),
            path: path.into(),
        }
    }

    fn encode(&self) -> String {
        format!("{}\n{}\n{}\n{}", self.name, self.user_name, self.server, self.path)
    }
}

/// Stores remote records.
pub struct RemoteRegistry {
    dir: PathBuf,
}

impl RemoteRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_of(&self, name: &RemoteName) -> PathBuf {
        self.dir.join(name.as_str())
    }

    pub fn remote_exists(&self, name: &RemoteName) -> bool {
        self.path_of(name).is_file()
    }

    /// add a new remote
    pub fn add_remote(&self, remote: &Remote) -> StorageResult<()> {
        if self.remote_exists(&remote.name) {
            return Err(StorageError::RemoteAlreadyExists(remote.name.clone()));
        }

        for field in [&remote.user_name, &remote.server, &remote.path] {
            if field.is_empty() || field.contains(['\n', '\r']) {
                return Err(StorageError::InvalidRemoteField(field.clone()));
            }
        }

        write_atomic(&self.path_of(&remote.name), remote.encode().as_bytes())?;
        debug!(remote = %remote.name, server = %remote.server, "added remote");
        Ok(())
    }

    /// load a remote record
    pub fn load_remote(&self, name: &RemoteName) -> StorageResult<Remote> {
        let path = self.path_of(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::RemoteNotFound(name.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let fields: Vec<&str> = raw.split('\n').collect();
        let [stored_name, user, server, remote_path] = fields[..] else {
            return Err(StorageError::CorruptedData {
                path,
                reason: format!("expected 4 fields, found {}", fields.len()),
            });
        };

        if stored_name != name.as_str() {
            return Err(StorageError::CorruptedData {
                path,
                reason: format!("record holds remote {} instead of {}", stored_name, name),
            });
        }

        Ok(Remote::new(name.clone(), user, server, remote_path))
    }

    /// delete a remote record
    pub fn remove_remote(&self, name: &RemoteName) -> StorageResult<()> {
        if !self.remote_exists(name) {
            return Err(StorageError::RemoteNotFound(name.clone()));
        }
        fs::remove_file(self.path_of(name))?;
        debug!(remote = %name, "removed remote");
        Ok(())
    }

    /// all remote names, sorted
    pub fn remote_names(&self) -> StorageResult<Vec<RemoteName>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if let Ok(name) = RemoteName::new(name) {
                    names.push(name);
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
