//!   Repository handle.
//!
//!  This is the central component of the storage layer. It owns the object
//!  store, the commit store, the branch registry and the working directory,
//!  and exposes the operations every command is built from.
//!
//!  Each operation validates its preconditions before writing anything, so
//!  a rejected request leaves the repository exactly as it was. There is
//!  no multi-record transaction: a crash between persisting a commit and
//!  moving the branch head leaves an unreferenced commit behind.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::config::RepositoryConfig;
use crate::storage::blob::ObjectStore;
use crate::storage::commit::{Commit, CommitStore};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::layout::{read_json, write_json, RepoLayout};
use crate::storage::lock::RepoLock;
use crate::storage::refs::{Branch, BranchRegistry};
use crate::storage::remote::{Remote, RemoteRegistry};
use crate::storage::staging::{Removal, StagingArea};
use crate::storage::types::{BlobRef, BranchName, CommitId, FileName, InvalidNameError, RemoteName};
use crate::storage::worktree::{RevertSummary, WorkingDirectory};

/// The main repository handle.
///
/// Holds the repository lock (unless disabled in the config) for as long
/// as it lives.
pub struct Repository {
    config: RepositoryConfig,
    layout: RepoLayout,
    objects: ObjectStore,
    commits: CommitStore,
    branches: BranchRegistry,
    remotes: RemoteRegistry,
    work: WorkingDirectory,
    _lock: Option<RepoLock>,
}

/// What `checkout <name>` refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutName {
    Branch(BranchName),
    File(FileName),
}

/// What `checkout <name>` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutTarget {
    Branch(BranchName, RevertSummary),
    File(FileName),
}

/// Snapshot of the repository for `status`.
#[derive(Debug, Clone)]
pub struct Status {
    pub current_branch: BranchName,
    pub branches: Vec<BranchName>,
    pub staged: Vec<FileName>,
    pub removed: Vec<FileName>,
}

impl Repository {
    fn assemble(config: RepositoryConfig, layout: RepoLayout, lock: Option<RepoLock>) -> Self {
        Self {
            objects: ObjectStore::new(layout.objects_dir()),
            commits: CommitStore::new(layout.commits_dir()),
            branches: BranchRegistry::new(layout.branches_dir(), layout.head_file()),
            remotes: RemoteRegistry::new(layout.remotes_dir()),
            work: WorkingDirectory::new(layout.work_dir()),
            config,
            layout,
            _lock: lock,
        }
    }

    fn lock(config: &RepositoryConfig, layout: &RepoLayout) -> StorageResult<Option<RepoLock>> {
        if config.acquire_lock {
            RepoLock::acquire(&layout.lock_file()).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Initialize a new repository.
    ///
    /// Creates the root commit, the default branch pointing at it, and makes
    /// that branch current. Fails if a repository already exists.
    pub fn init(config: RepositoryConfig) -> StorageResult<Self> {
        let layout = RepoLayout::new(&config.work_dir, &config.meta_dir_name);
        layout.create()?;
        let lock = Self::lock(&config, &layout)?;
        let repo = Self::assemble(config, layout, lock);

        let root = Commit::root();
        repo.commits.store(&root)?;

        let branch = Branch::new(repo.config.default_branch.clone(), root.id);
        repo.branches.cache_branch(&branch)?;
        repo.branches.set_current_branch(&branch.name)?;
        repo.save_staging(&StagingArea::derive_from(&root))?;

        info!(path = %repo.work_dir().display(), branch = %branch.name, "initialized repository");
        Ok(repo)
    }

    /// Open an existing repository.
    pub fn open(config: RepositoryConfig) -> StorageResult<Self> {
        let layout = RepoLayout::new(&config.work_dir, &config.meta_dir_name);
        layout.validate()?;
        let lock = Self::lock(&config, &layout)?;
        Ok(Self::assemble(config, layout, lock))
    }

    /// Get the working directory path.
    pub fn work_dir(&self) -> &Path {
        self.layout.work_dir()
    }

    /// Get the repository marker directory path.
    pub fn meta_dir(&self) -> &Path {
        self.layout.meta_dir()
    }

    /// Validate a user-supplied file name against this repository.
    pub fn file_name(&self, raw: &str) -> StorageResult<FileName> {
        let name = FileName::new(raw)?;
        if name.first_segment() == self.config.meta_dir_name {
            return Err(InvalidNameError::Reserved(self.config.meta_dir_name.clone()).into());
        }
        Ok(name)
    }

    // ==================== Commit Graph ====================

    /// The staging layer on top of the checked-out commit.
    ///
    /// If no staging record exists (first use after a branch switch), a
    /// clean one is derived from the current branch head.
    pub fn current_commit(&self) -> StorageResult<StagingArea> {
        match read_json::<StagingArea>(&self.layout.staging_file())? {
            Some(staging) => Ok(staging),
            None => {
                let head = self.head_commit()?;
                Ok(StagingArea::derive_from(&head))
            }
        }
    }

    fn save_staging(&self, staging: &StagingArea) -> StorageResult<()> {
        write_json(&self.layout.staging_file(), staging)
    }

    /// Stage the working-directory content of `name` for the next commit.
    ///
    /// Returns `true` if the staged state changed.
    pub fn stage_file(&self, name: &FileName) -> StorageResult<bool> {
        let bytes = self.work.read_file(name)?;
        let mut staging = self.current_commit()?;
        let parent = self.commits.load(staging.parent_id())?;

        let blob = self.objects.put(name, &bytes)?;
        let changed = staging.stage(blob, &parent);
        if changed {
            self.save_staging(&staging)?;
        }
        Ok(changed)
    }

    /// Drop `name` from the next commit.
    ///
    /// The working-directory file is left in place.
    pub fn mark_for_removal(&self, name: &FileName) -> StorageResult<Removal> {
        let mut staging = self.current_commit()?;
        let parent = self.commits.load(staging.parent_id())?;

        let outcome = staging.mark_for_removal(name, &parent)?;
        self.save_staging(&staging)?;
        Ok(outcome)
    }

    /// Commit the staging layer and advance the current branch to it.
    pub fn push(&self, message: &str) -> StorageResult<Commit> {
        let staging = self.current_commit()?;
        let branch = self.branches.current_branch()?;

        let id = self.commits.next_id()?;
        let commit = staging.freeze(id, message)?;

        self.commits.store(&commit)?;
        self.branches.update_branch(&branch, commit.id)?;
        self.save_staging(&StagingArea::derive_from(&commit))?;

        info!(id = %commit.id, branch = %branch, files = commit.tracked_files.len(), "created commit");
        Ok(commit)
    }

    /// Load a persisted commit.
    pub fn load_commit(&self, id: CommitId) -> StorageResult<Commit> {
        self.commits.load(id)
    }

    /// Check whether a commit was ever persisted.
    pub fn commit_exists(&self, id: CommitId) -> bool {
        self.commits.exists(id)
    }

    /// The blob recorded for `name` in `commit`.
    pub fn get_object<'c>(&self, commit: &'c Commit, name: &FileName) -> StorageResult<&'c BlobRef> {
        commit.get_object(name)
    }

    /// Make the working directory reflect `commit` and rebase the staging
    /// layer onto it.
    ///
    /// Files tracked by the checked-out commit or staged on top of it but
    /// absent from `commit` are deleted; everything `commit` tracks is
    /// restored. Branch pointers are not touched.
    pub fn revert_to_commit(&self, commit: &Commit) -> StorageResult<RevertSummary> {
        let staging = self.current_commit()?;
        let parent = self.commits.load(staging.parent_id())?;

        let mut current: BTreeMap<FileName, BlobRef> = parent.tracked_files;
        current.extend(
            staging
                .tracked_files()
                .iter()
                .map(|(name, blob)| (name.clone(), blob.clone())),
        );

        let summary = self.work.revert(&self.objects, &current, commit)?;
        self.save_staging(&StagingArea::derive_from(commit))?;
        Ok(summary)
    }

    /// The commit at the head of the current branch.
    pub fn head_commit(&self) -> StorageResult<Commit> {
        self.commits.load(self.branches.id_of_head_commit()?)
    }

    /// History of the current branch, newest first, ending at the root.
    pub fn log(&self) -> StorageResult<Vec<Commit>> {
        let head = self.branches.id_of_head_commit()?;
        self.commits.history(head).collect()
    }

    /// Every persisted commit in creation order, regardless of branch.
    pub fn global_log(&self) -> StorageResult<Vec<Commit>> {
        self.commits
            .ids()?
            .into_iter()
            .map(|id| self.commits.load(id))
            .collect()
    }

    // ==================== Checkout / Reset ====================

    /// Restore `name` as it was in commit `id`.
    pub fn checkout_file_at(&self, id: CommitId, name: &FileName) -> StorageResult<()> {
        let commit = self.commits.load(id)?;
        let blob = commit.get_object(name)?;
        self.work.pull_file(&self.objects, blob)?;
        info!(file = %name, commit = %id, "checked out file");
        Ok(())
    }

    /// Restore `name` as it is in the current head commit.
    pub fn checkout_file(&self, name: &FileName) -> StorageResult<()> {
        let head = self.branches.id_of_head_commit()?;
        self.checkout_file_at(head, name)
    }

    /// Switch to branch `name`: revert to its head and make it current.
    pub fn checkout_branch(&self, name: &BranchName) -> StorageResult<RevertSummary> {
        let head = self.commits.load(self.branches.resolve_branch(name)?)?;

        let summary = self.revert_to_commit(&head)?;
        self.branches.set_current_branch(name)?;

        info!(branch = %name, head = %head.id, "switched branch");
        Ok(summary)
    }

    /// Decide what `checkout <name>` refers to without touching anything.
    ///
    /// A branch wins over a file of the same name; a file must be tracked
    /// by the current head commit.
    pub fn resolve_checkout(&self, target: &str) -> StorageResult<CheckoutName> {
        if let Ok(branch) = BranchName::new(target) {
            if self.branches.branch_exists(&branch) {
                return Ok(CheckoutName::Branch(branch));
            }
        }

        if let Ok(name) = self.file_name(target) {
            if self.head_commit()?.tracks(&name) {
                return Ok(CheckoutName::File(name));
            }
        }

        Err(StorageError::NoSuchFileOrBranch(target.to_string()))
    }

    /// `checkout <name>`: switch branch or restore a file.
    pub fn checkout(&self, target: &str) -> StorageResult<CheckoutTarget> {
        match self.resolve_checkout(target)? {
            CheckoutName::Branch(branch) => {
                let summary = self.checkout_branch(&branch)?;
                Ok(CheckoutTarget::Branch(branch, summary))
            }
            CheckoutName::File(name) => {
                self.checkout_file(&name)?;
                Ok(CheckoutTarget::File(name))
            }
        }
    }

    /// Move the current branch to commit `id` and make the working
    /// directory match it.
    pub fn reset(&self, id: CommitId) -> StorageResult<RevertSummary> {
        let commit = self.commits.load(id)?;
        let branch = self.branches.current_branch()?;

        let summary = self.revert_to_commit(&commit)?;
        self.branches.update_branch(&branch, id)?;

        info!(branch = %branch, head = %id, "reset branch");
        Ok(summary)
    }

    // ==================== Branch Operations ====================

    /// Create a branch pointing at the current head.
    pub fn create_branch(&self, name: &BranchName) -> StorageResult<Branch> {
        if self.branches.branch_exists(name) {
            return Err(StorageError::BranchAlreadyExists(name.clone()));
        }

        let branch = Branch::new(name.clone(), self.branches.id_of_head_commit()?);
        self.branches.cache_branch(&branch)?;
        info!(branch = %name, head = %branch.head_commit_id, "created branch");
        Ok(branch)
    }

    /// Delete a branch; the current branch can't be deleted.
    pub fn remove_branch(&self, name: &BranchName) -> StorageResult<()> {
        self.branches.delete_branch(name)?;
        info!(branch = %name, "removed branch");
        Ok(())
    }

    /// Check if a branch exists.
    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.branches.branch_exists(name)
    }

    /// Name of the current branch.
    pub fn current_branch(&self) -> StorageResult<BranchName> {
        self.branches.current_branch()
    }

    /// Head commit of a branch.
    pub fn head_of_branch(&self, name: &BranchName) -> StorageResult<Commit> {
        self.commits.load(self.branches.resolve_branch(name)?)
    }

    /// All branch names, sorted.
    pub fn branch_names(&self) -> StorageResult<Vec<BranchName>> {
        self.branches.branch_names()
    }

    // ==================== Remotes ====================

    /// Record a new remote.
    pub fn add_remote(&self, remote: &Remote) -> StorageResult<()> {
        self.remotes.add_remote(remote)
    }

    /// Delete a remote record.
    pub fn remove_remote(&self, name: &RemoteName) -> StorageResult<()> {
        self.remotes.remove_remote(name)
    }

    /// Load a remote record.
    pub fn remote(&self, name: &RemoteName) -> StorageResult<Remote> {
        self.remotes.load_remote(name)
    }

    // ==================== Utility Operations ====================

    /// Branches, staged files and files marked for removal.
    pub fn status(&self) -> StorageResult<Status> {
        let staging = self.current_commit()?;
        Ok(Status {
            current_branch: self.branches.current_branch()?,
            branches: self.branches.branch_names()?,
            staged: staging.staged_files().iter().cloned().collect(),
            removed: staging.removed_files().iter().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(RepositoryConfig::new(dir.path())).unwrap();
        (dir, repo)
    }

    fn name(s: &str) -> FileName {
        FileName::new(s).unwrap()
    }

    fn write(repo: &Repository, file: &str, content: &str) {
        let path = repo.work_dir().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn read(repo: &Repository, file: &str) -> Option<String> {
        fs::read_to_string(repo.work_dir().join(file)).ok()
    }

    fn commit_file(repo: &Repository, file: &str, content: &str, message: &str) -> Commit {
        write(repo, file, content);
        repo.stage_file(&name(file)).unwrap();
        repo.push(message).unwrap()
    }

    #[test]
    fn test_init_creates_root() {
        let (_dir, repo) = setup();

        let root = repo.head_commit().unwrap();
        assert_eq!(root.id, CommitId::ROOT);
        assert!(root.is_root());
        assert_eq!(root.message, "initial commit");
        assert_eq!(repo.current_branch().unwrap(), BranchName::master());
        assert_eq!(repo.branch_names().unwrap(), vec![BranchName::master()]);
    }

    #[test]
    fn test_init_twice_fails() {
        let (dir, repo) = setup();
        drop(repo);

        let result = Repository::init(RepositoryConfig::new(dir.path()));
        assert!(matches!(result, Err(StorageError::AlreadyInitialized(_))));
    }

    #[test]
    fn test_open() {
        let (dir, repo) = setup();
        let first = commit_file(&repo, "a.txt", "hello", "add a");
        drop(repo);

        let repo = Repository::open(RepositoryConfig::new(dir.path())).unwrap();
        assert_eq!(repo.head_commit().unwrap(), first);
    }

    #[test]
    fn test_open_uninitialized() {
        let dir = TempDir::new().unwrap();
        let result = Repository::open(RepositoryConfig::new(dir.path()));
        assert!(matches!(result, Err(StorageError::NotInitialized(_))));
    }

    #[test]
    fn test_second_handle_is_locked_out() {
        let (dir, _repo) = setup();
        let result = Repository::open(RepositoryConfig::new(dir.path()));
        assert!(matches!(result, Err(StorageError::Locked(_))));

        // opt-out for callers that coordinate access themselves
        Repository::open(RepositoryConfig::new(dir.path()).acquire_lock(false)).unwrap();
    }

    #[test]
    fn test_stage_missing_file() {
        let (_dir, repo) = setup();
        let result = repo.stage_file(&name("ghost.txt"));
        assert!(matches!(result, Err(StorageError::FileNotFound(_))));
        assert!(!repo.current_commit().unwrap().has_changes());
    }

    #[test]
    fn test_meta_dir_is_not_a_file_name() {
        let dir = TempDir::new().unwrap();
        let config = RepositoryConfig::new(dir.path()).meta_dir_name(".vc");
        let repo = Repository::init(config).unwrap();

        assert!(matches!(
            repo.file_name(".vc/HEAD"),
            Err(StorageError::InvalidName(InvalidNameError::Reserved(_)))
        ));
        assert!(repo.file_name("src/.vc").is_ok());
        // only the configured marker directory is off limits
        assert!(repo.file_name(".gitlet/notes.txt").is_ok());
    }

    #[test]
    fn test_default_meta_dir_is_not_a_file_name() {
        let (_dir, repo) = setup();
        assert!(matches!(
            repo.file_name(".gitlet/HEAD"),
            Err(StorageError::InvalidName(InvalidNameError::Reserved(_)))
        ));
    }

    #[test]
    fn test_stage_long_file_names() {
        let (_dir, repo) = setup();
        let flat = "n".repeat(130);
        let nested = format!("{}/{}/{}.rs", "a".repeat(50), "b".repeat(50), "c".repeat(30));

        for file in [flat.as_str(), nested.as_str()] {
            write(&repo, file, "long");
            assert!(repo.stage_file(&name(file)).unwrap());
        }
        let commit = repo.push("long names").unwrap();

        fs::remove_file(repo.work_dir().join(&nested)).unwrap();
        repo.checkout_file_at(commit.id, &name(&nested)).unwrap();
        assert_eq!(read(&repo, &nested).as_deref(), Some("long"));
    }

    #[test]
    fn test_resolve_checkout() {
        let (_dir, repo) = setup();
        commit_file(&repo, "a.txt", "a", "add a");
        repo.create_branch(&BranchName::new("dev").unwrap()).unwrap();

        assert_eq!(
            repo.resolve_checkout("dev").unwrap(),
            CheckoutName::Branch(BranchName::new("dev").unwrap())
        );
        assert_eq!(repo.resolve_checkout("a.txt").unwrap(), CheckoutName::File(name("a.txt")));

        write(&repo, "loose.txt", "untracked");
        assert!(matches!(
            repo.resolve_checkout("loose.txt"),
            Err(StorageError::NoSuchFileOrBranch(_))
        ));
    }

    #[test]
    fn test_idempotent_staging() {
        let (_dir, repo) = setup();
        write(&repo, "a.txt", "hello");

        assert!(repo.stage_file(&name("a.txt")).unwrap());
        let before = repo.current_commit().unwrap();
        assert!(!repo.stage_file(&name("a.txt")).unwrap());
        assert_eq!(repo.current_commit().unwrap(), before);
    }

    #[test]
    fn test_push_advances_branch() {
        let (_dir, repo) = setup();
        let commit = commit_file(&repo, "a.txt", "hello", "add a");

        assert_eq!(commit.id, CommitId::new(1));
        assert_eq!(commit.parent_id, Some(CommitId::ROOT));
        assert_eq!(repo.head_commit().unwrap(), commit);

        let staging = repo.current_commit().unwrap();
        assert_eq!(staging.parent_id(), commit.id);
        assert!(!staging.has_changes());
    }

    #[test]
    fn test_push_rejects_empty_message() {
        let (_dir, repo) = setup();
        write(&repo, "a.txt", "hello");
        repo.stage_file(&name("a.txt")).unwrap();

        assert!(matches!(repo.push(""), Err(StorageError::EmptyMessage)));
        assert_eq!(repo.head_commit().unwrap().id, CommitId::ROOT);
        assert!(repo.current_commit().unwrap().has_changes());
    }

    #[test]
    fn test_push_without_changes_is_allowed() {
        let (_dir, repo) = setup();
        let first = commit_file(&repo, "a.txt", "hello", "add a");
        let second = repo.push("nothing new").unwrap();

        assert_eq!(second.parent_id, Some(first.id));
        assert_eq!(second.tracked_files, first.tracked_files);
    }

    #[test]
    fn test_commit_immutability() {
        let (_dir, repo) = setup();
        let first = commit_file(&repo, "a.txt", "v1", "v1");

        write(&repo, "a.txt", "v2");
        repo.stage_file(&name("a.txt")).unwrap();
        write(&repo, "b.txt", "b");
        repo.stage_file(&name("b.txt")).unwrap();
        repo.mark_for_removal(&name("a.txt")).unwrap();

        assert_eq!(repo.load_commit(first.id).unwrap(), first);
    }

    #[test]
    fn test_remove_and_commit() {
        let (_dir, repo) = setup();
        commit_file(&repo, "a.txt", "hello", "add a");

        assert_eq!(repo.mark_for_removal(&name("a.txt")).unwrap(), Removal::Marked);
        let status = repo.status().unwrap();
        assert_eq!(status.removed, vec![name("a.txt")]);

        let commit = repo.push("remove a").unwrap();
        assert!(!commit.tracks(&name("a.txt")));
        assert!(repo.status().unwrap().removed.is_empty());
    }

    #[test]
    fn test_remove_untracked_fails() {
        let (_dir, repo) = setup();
        write(&repo, "loose.txt", "x");

        let result = repo.mark_for_removal(&name("loose.txt"));
        assert!(matches!(result, Err(StorageError::NotTrackedOrStaged(_))));
    }

    #[test]
    fn test_history_linearity() {
        let (_dir, repo) = setup();
        let n = 6;
        for i in 0..n {
            commit_file(&repo, "a.txt", &format!("v{}", i), &format!("commit {}", i));
        }

        let log = repo.log().unwrap();
        assert_eq!(log.len(), n + 1);
        assert_eq!(log[0].message, format!("commit {}", n - 1));
        let root = log.last().unwrap();
        assert!(root.is_root());
        assert!(root.parent_id.is_none());
    }

    #[test]
    fn test_global_log_spans_branches() {
        let (_dir, repo) = setup();
        commit_file(&repo, "a.txt", "a", "on master");
        repo.create_branch(&BranchName::new("side").unwrap()).unwrap();
        repo.checkout_branch(&BranchName::new("side").unwrap()).unwrap();
        commit_file(&repo, "b.txt", "b", "on side");
        repo.checkout_branch(&BranchName::master()).unwrap();

        let log: Vec<_> = repo.log().unwrap().into_iter().map(|c| c.message).collect();
        assert_eq!(log, vec!["on master", "initial commit"]);

        let global: Vec<_> = repo.global_log().unwrap().into_iter().map(|c| c.message).collect();
        assert_eq!(global, vec!["initial commit", "on master", "on side"]);
    }

    #[test]
    fn test_add_commit_remove_checkout_scenario() {
        let (_dir, repo) = setup();
        let added = commit_file(&repo, "a.txt", "hello", "add a");
        repo.mark_for_removal(&name("a.txt")).unwrap();
        repo.push("remove a").unwrap();

        let log = repo.log().unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].message, "remove a");
        assert_eq!(log[1].message, "add a");

        fs::remove_file(repo.work_dir().join("a.txt")).unwrap();
        repo.checkout_file_at(added.id, &name("a.txt")).unwrap();
        assert_eq!(read(&repo, "a.txt").as_deref(), Some("hello"));
    }

    #[test]
    fn test_checkout_file_from_head() {
        let (_dir, repo) = setup();
        commit_file(&repo, "a.txt", "committed", "add a");
        write(&repo, "a.txt", "scribbles");

        let target = repo.checkout("a.txt").unwrap();
        assert_eq!(target, CheckoutTarget::File(name("a.txt")));
        assert_eq!(read(&repo, "a.txt").as_deref(), Some("committed"));
    }

    #[test]
    fn test_checkout_file_errors() {
        let (_dir, repo) = setup();
        let added = commit_file(&repo, "a.txt", "x", "add a");

        let missing_commit = repo.checkout_file_at(CommitId::new(99), &name("a.txt"));
        assert!(matches!(missing_commit, Err(StorageError::CommitNotFound(_))));

        let missing_file = repo.checkout_file_at(added.id, &name("b.txt"));
        assert!(matches!(missing_file, Err(StorageError::FileNotFound(_))));

        let neither = repo.checkout("nothing-here");
        assert!(matches!(neither, Err(StorageError::NoSuchFileOrBranch(_))));
    }

    #[test]
    fn test_branch_switch_scenario() {
        let (_dir, repo) = setup();
        let head = commit_file(&repo, "a.txt", "base", "base");
        let feature = BranchName::new("feature").unwrap();
        repo.create_branch(&feature).unwrap();

        commit_file(&repo, "a.txt", "master edit", "edit a");
        commit_file(&repo, "b.txt", "only on master", "add b");

        let target = repo.checkout("feature").unwrap();
        assert!(matches!(target, CheckoutTarget::Branch(ref b, _) if b == &feature));
        assert_eq!(repo.current_branch().unwrap(), feature);
        assert_eq!(read(&repo, "a.txt").as_deref(), Some("base"));
        assert_eq!(read(&repo, "b.txt"), None);

        let staging = repo.current_commit().unwrap();
        assert_eq!(staging.parent_id(), head.id);
        assert_eq!(staging.tracked_files(), &head.tracked_files);

        // commits on the new branch descend from its head
        let next = commit_file(&repo, "c.txt", "c", "feature work");
        assert_eq!(next.parent_id, Some(head.id));
        assert_eq!(repo.head_of_branch(&feature).unwrap(), next);
    }

    #[test]
    fn test_branch_switch_keeps_untracked_files() {
        let (_dir, repo) = setup();
        commit_file(&repo, "a.txt", "a", "add a");
        repo.create_branch(&BranchName::new("other").unwrap()).unwrap();
        write(&repo, "scratch.txt", "mine");

        repo.checkout("other").unwrap();
        assert_eq!(read(&repo, "scratch.txt").as_deref(), Some("mine"));
    }

    #[test]
    fn test_branch_switch_drops_staged_only_files() {
        let (_dir, repo) = setup();
        repo.create_branch(&BranchName::new("other").unwrap()).unwrap();
        write(&repo, "new.txt", "staged");
        repo.stage_file(&name("new.txt")).unwrap();

        repo.checkout("other").unwrap();
        assert_eq!(read(&repo, "new.txt"), None);
        assert!(!repo.current_commit().unwrap().has_changes());
    }

    #[test]
    fn test_reset_scenario() {
        let (_dir, repo) = setup();
        let first = commit_file(&repo, "a.txt", "one", "one");
        commit_file(&repo, "a.txt", "two", "two");
        commit_file(&repo, "b.txt", "b", "three");

        repo.reset(first.id).unwrap();

        assert_eq!(repo.head_commit().unwrap().id, first.id);
        assert_eq!(read(&repo, "a.txt").as_deref(), Some("one"));
        assert_eq!(read(&repo, "b.txt"), None);
        assert_eq!(repo.log().unwrap().len(), 2);
    }

    #[test]
    fn test_reset_to_commit_on_other_branch() {
        let (_dir, repo) = setup();
        let side = BranchName::new("side").unwrap();
        repo.create_branch(&side).unwrap();
        repo.checkout_branch(&side).unwrap();
        let side_commit = commit_file(&repo, "s.txt", "side", "side work");
        repo.checkout_branch(&BranchName::master()).unwrap();
        assert_eq!(read(&repo, "s.txt"), None);

        repo.reset(side_commit.id).unwrap();
        assert_eq!(repo.current_branch().unwrap(), BranchName::master());
        assert_eq!(repo.head_commit().unwrap().id, side_commit.id);
        assert_eq!(read(&repo, "s.txt").as_deref(), Some("side"));
    }

    #[test]
    fn test_reset_unknown_commit() {
        let (_dir, repo) = setup();
        commit_file(&repo, "a.txt", "a", "a");

        let result = repo.reset(CommitId::new(42));
        assert!(matches!(result, Err(StorageError::CommitNotFound(_))));
        assert_eq!(repo.head_commit().unwrap().id, CommitId::new(1));
    }

    #[test]
    fn test_revert_exactness() {
        let (_dir, repo) = setup();
        let target = commit_file(&repo, "keep.txt", "k", "keep");
        commit_file(&repo, "x.txt", "x", "x");
        commit_file(&repo, "dir/y.txt", "y", "y");
        write(&repo, "keep.txt", "dirty");

        repo.revert_to_commit(&target).unwrap();

        for file in target.tracked_files.keys() {
            assert!(repo.work_dir().join(file.as_str()).is_file());
        }
        assert_eq!(read(&repo, "keep.txt").as_deref(), Some("k"));
        assert_eq!(read(&repo, "x.txt"), None);
        assert_eq!(read(&repo, "dir/y.txt"), None);
    }

    #[test]
    fn test_create_branch_collision() {
        let (_dir, repo) = setup();
        let result = repo.create_branch(&BranchName::master());
        assert!(matches!(result, Err(StorageError::BranchAlreadyExists(_))));
    }

    #[test]
    fn test_remove_branch() {
        let (_dir, repo) = setup();
        let feature = BranchName::new("feature").unwrap();
        repo.create_branch(&feature).unwrap();

        assert!(matches!(
            repo.remove_branch(&BranchName::master()),
            Err(StorageError::CannotRemoveCurrentBranch(_))
        ));
        repo.remove_branch(&feature).unwrap();
        assert!(!repo.branch_exists(&feature));
        assert!(matches!(repo.remove_branch(&feature), Err(StorageError::BranchNotFound(_))));
    }

    #[test]
    fn test_status() {
        let (_dir, repo) = setup();
        commit_file(&repo, "a.txt", "a", "add a");
        repo.create_branch(&BranchName::new("dev").unwrap()).unwrap();
        write(&repo, "c.txt", "c");
        write(&repo, "b.txt", "b");
        repo.stage_file(&name("c.txt")).unwrap();
        repo.stage_file(&name("b.txt")).unwrap();
        repo.mark_for_removal(&name("a.txt")).unwrap();

        let status = repo.status().unwrap();
        assert_eq!(status.current_branch, BranchName::master());
        assert_eq!(status.branches.len(), 2);
        assert_eq!(status.staged, vec![name("b.txt"), name("c.txt")]);
        assert_eq!(status.removed, vec![name("a.txt")]);
    }

    #[test]
    fn test_missing_staging_record_is_rederived() {
        let (_dir, repo) = setup();
        let commit = commit_file(&repo, "a.txt", "a", "add a");
        fs::remove_file(repo.meta_dir().join("STAGING")).unwrap();

        let staging = repo.current_commit().unwrap();
        assert_eq!(staging.parent_id(), commit.id);
        assert_eq!(staging.tracked_files(), &commit.tracked_files);
    }

    #[test]
    fn test_remotes() {
        let (_dir, repo) = setup();
        let origin = RemoteName::new("origin").unwrap();
        let remote = Remote::new(origin.clone(), "bob", "host", "/repo");

        repo.add_remote(&remote).unwrap();
        assert_eq!(repo.remote(&origin).unwrap(), remote);
        repo.remove_remote(&origin).unwrap();
        assert!(matches!(repo.remote(&origin), Err(StorageError::RemoteNotFound(_))));
    }
}
