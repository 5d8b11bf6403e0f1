//! storage layer for gitlet
//!
//! this module owns everything that touches disk: content-addressed blobs,
//! immutable commits, the mutable staging layer, branch pointers and the
//! working directory. The command layer uses this API and never touches the
//! repository directory directly.
//!
//!  # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Repository                           │
//! │   (High-level API: stage, commit, checkout, reset, log)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌──────────────┬──────┴───────┬──────────────┐
//!        │              │              │              │
//!        ▼              ▼              ▼              ▼
//!  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐
//!  │  staging  │  │   refs    │  │  remote   │  │ worktree  │
//!  │ (pending) │  │ (branches)│  │ (records) │  │  (files)  │
//!  └───────────┘  └───────────┘  └───────────┘  └───────────┘
//!        │              │                             │
//!        ▼              ▼                             ▼
//!  ┌─────────────────────────────┐             ┌─────────────┐
//!  │           commit            │────────────▶│    blob     │
//!  │          (history)          │             │  (content)  │
//!  └─────────────────────────────┘             └─────────────┘
//!  ```
//!
//! # Usage
//!
//! ```no_run
//! use gitlet::config::RepositoryConfig;
//! use gitlet::storage::{FileName, Repository};
//!
//! # fn main() -> Result<(), gitlet::storage::StorageError> {
//! let repo = Repository::init(RepositoryConfig::new("./project"))?;
//!
//! let name = FileName::new("notes.txt")?;
//! repo.stage_file(&name)?;
//! let commit = repo.push("add notes")?;
//!
//! for entry in repo.log()? {
//!     println!("{} {}", entry.id, entry.message);
//! }
//! # let _ = commit;
//! # Ok(())
//! # }
//! ```

mod blob;
mod commit;
mod error;
mod layout;
mod lock;
mod refs;
mod remote;
mod repository;
mod staging;
mod types;
mod worktree;

// Re-export public API
pub use blob::ObjectStore;
pub use commit::{Commit, CommitStore, History, INITIAL_COMMIT_MESSAGE};
pub use error::{ErrorKind, StorageError, StorageResult};
pub use layout::RepoLayout;
pub use lock::RepoLock;
pub use refs::{Branch, BranchRegistry};
pub use remote::{Remote, RemoteRegistry};
pub use repository::{CheckoutName, CheckoutTarget, Repository, Status};
pub use staging::{Removal, StagingArea};
pub use types::{BlobRef, BranchName, CommitId, ContentHash, FileName, InvalidNameError, RemoteName};
pub use worktree::{RevertSummary, WorkingDirectory};
