//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `-C` / `--directory <path>`: operate on the repository in that directory
//! - `-y` / `--yes`: answer "yes" to confirmation prompts
//! - `-v`: increase log verbosity (repeatable)

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::storage::CommitId;

/// Gitlet - a small local version-control system
#[derive(Parser, Debug)]
#[command(name = "gitlet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gitlet was started in this directory
    #[arg(short = 'C', long = "directory", global = true, default_value = ".")]
    pub directory: PathBuf,

    /// Assume "yes" at confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new repository in the working directory
    Init,

    /// Stage a file for the next commit
    Add {
        /// Path relative to the working directory
        file: String,
    },

    /// Record the staged snapshot
    Commit {
        /// Commit message
        message: String,
    },

    /// Unstage a file or mark it for removal in the next commit
    Rm {
        /// Path relative to the working directory
        file: String,
    },

    /// Show the history of the current branch
    Log,

    /// Show every commit ever made
    #[command(name = "global-log")]
    GlobalLog,

    /// Restore a file, or switch branches
    ///
    /// `checkout <commit-id> <file>` restores a file from a commit.
    /// `checkout <name>` switches to branch <name> if it exists, otherwise
    /// restores file <name> from the current head commit.
    Checkout {
        /// Branch name, file name, or commit id when a file follows
        target: String,
        /// File to restore from commit <target>
        file: Option<String>,
    },

    /// Create a branch at the current head commit
    Branch {
        name: String,
    },

    /// Delete a branch pointer
    #[command(name = "rm-branch")]
    RmBranch {
        name: String,
    },

    /// Show branches, staged files and files marked for removal
    Status,

    /// Move the current branch to a commit and check it out
    Reset {
        /// Id of the commit to reset to
        commit_id: CommitId,
    },

    /// Record a remote repository location
    #[command(name = "add-remote")]
    AddRemote {
        name: String,
        user: String,
        server: String,
        path: String,
    },

    /// Forget a remote repository location
    #[command(name = "rm-remote")]
    RmRemote {
        name: String,
    },
}

impl Command {
    /// Whether the command may overwrite or delete working-directory files.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Checkout { .. } | Self::Reset { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["gitlet", "-C", "/tmp/w", "-y", "-vv", "status"]).unwrap();
        assert_eq!(cli.directory, PathBuf::from("/tmp/w"));
        assert!(cli.yes);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.command, Command::Status);
    }

    #[test]
    fn test_checkout_forms() {
        let cli = Cli::try_parse_from(["gitlet", "checkout", "feature"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Checkout {
                target: "feature".into(),
                file: None
            }
        );

        let cli = Cli::try_parse_from(["gitlet", "checkout", "3", "a.txt"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Checkout {
                target: "3".into(),
                file: Some("a.txt".into())
            }
        );
    }

    #[test]
    fn test_reset_parses_commit_id() {
        let cli = Cli::try_parse_from(["gitlet", "reset", "4"]).unwrap();
        assert_eq!(cli.command, Command::Reset { commit_id: CommitId::new(4) });
        assert!(cli.command.is_destructive());

        assert!(Cli::try_parse_from(["gitlet", "reset", "four"]).is_err());
    }

    #[test]
    fn test_hyphenated_names() {
        let cli = Cli::try_parse_from(["gitlet", "global-log"]).unwrap();
        assert_eq!(cli.command, Command::GlobalLog);

        let cli = Cli::try_parse_from(["gitlet", "rm-branch", "old"]).unwrap();
        assert_eq!(cli.command, Command::RmBranch { name: "old".into() });
        assert!(!cli.command.is_destructive());
    }
}
