//! Gitlet - a small local version-control system
//!
//! This crate snapshots the files of a working directory into immutable,
//! integer-numbered commits. File contents live in a content-addressed
//! object store, commits form a single-parent history ending at a root
//! commit, and named branches point at commits. Everything is kept under
//! `.gitlet/` inside the working directory.
//!
//! # Example
//!
//! ```no_run
//! use gitlet::config::RepositoryConfig;
//! use gitlet::storage::{FileName, Repository};
//!
//! let repo = Repository::init(RepositoryConfig::new("./project")).unwrap();
//! repo.stage_file(&FileName::new("notes.txt").unwrap()).unwrap();
//! repo.push("add notes").unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod storage;
