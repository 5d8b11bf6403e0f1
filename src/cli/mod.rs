//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Ask for confirmation before commands that rewrite the working directory
//! - Translate each command into [`Repository`] operations and render the result
//!
//! The layer is thin: every state change goes through the repository handle,
//! which validates its own preconditions.

pub mod args;
mod error;
mod output;
mod prompt;

pub use args::{Cli, Command};
pub use error::{CommandError, CommandResult};

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::debug;

use crate::config::RepositoryConfig;
use crate::storage::{BranchName, CheckoutTarget, CommitId, Remote, RemoteName, Removal, Repository};

/// Run the CLI against the process's stdin and stdout.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> CommandResult<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    execute(
        &cli.directory,
        cli.yes,
        cli.command,
        &mut stdin.lock(),
        &mut stdout.lock(),
    )
}

/// Execute one command in `directory`.
pub fn execute<R: BufRead, W: Write>(
    directory: &Path,
    assume_yes: bool,
    command: Command,
    input: &mut R,
    out: &mut W,
) -> CommandResult<()> {
    let config = RepositoryConfig::new(directory);
    debug!(?command, directory = %directory.display(), "dispatching command");

    if command == Command::Init {
        let repo = Repository::init(config)?;
        writeln!(out, "Initialized empty repository in {}", repo.meta_dir().display())?;
        return Ok(());
    }

    let repo = Repository::open(config)?;

    // Fail on unknown commits, files and branches before asking anything.
    match &command {
        Command::Reset { commit_id } => {
            repo.load_commit(*commit_id)?;
        }
        Command::Checkout {
            target,
            file: Some(file),
        } => {
            let id: CommitId = target.parse()?;
            repo.load_commit(id)?.get_object(&repo.file_name(file)?)?;
        }
        Command::Checkout { target, file: None } => {
            repo.resolve_checkout(target)?;
        }
        _ => {}
    }

    if command.is_destructive() && !prompt::confirm(input, out, assume_yes)? {
        writeln!(out, "Aborting.")?;
        return Ok(());
    }

    match command {
        Command::Init => {}

        Command::Add { file } => {
            let name = repo.file_name(&file)?;
            if !repo.stage_file(&name)? {
                writeln!(out, "nothing to stage: {} is unchanged", name)?;
            }
        }

        Command::Commit { message } => {
            let commit = repo.push(&message)?;
            writeln!(out, "[{} {}] {}", repo.current_branch()?, commit.id, commit.summary())?;
        }

        Command::Rm { file } => {
            let name = repo.file_name(&file)?;
            match repo.mark_for_removal(&name)? {
                Removal::Marked => writeln!(out, "marked {} for removal", name)?,
                Removal::Unstaged => writeln!(out, "unstaged {}", name)?,
            }
        }

        Command::Log => output::write_log(out, &repo.log()?)?,

        Command::GlobalLog => output::write_log(out, &repo.global_log()?)?,

        Command::Checkout { target, file } => match file {
            Some(file) => {
                let id: CommitId = target.parse()?;
                repo.checkout_file_at(id, &repo.file_name(&file)?)?;
            }
            None => {
                if let CheckoutTarget::Branch(name, _) = repo.checkout(&target)? {
                    writeln!(out, "Switched to branch {}", name)?;
                }
            }
        },

        Command::Branch { name } => {
            repo.create_branch(&BranchName::new(name)?)?;
        }

        Command::RmBranch { name } => {
            repo.remove_branch(&BranchName::new(name)?)?;
        }

        Command::Status => output::write_status(out, &repo.status()?)?,

        Command::Reset { commit_id } => {
            repo.reset(commit_id)?;
            let head = repo.head_commit()?;
            writeln!(out, "HEAD is now at {} {}", head.id, head.summary())?;
        }

        Command::AddRemote {
            name,
            user,
            server,
            path,
        } => {
            let remote = Remote::new(RemoteName::new(name)?, user, server, path);
            repo.add_remote(&remote)?;
        }

        Command::RmRemote { name } => {
            repo.remove_remote(&RemoteName::new(name)?)?;
        }
    }

    Ok(())
}
