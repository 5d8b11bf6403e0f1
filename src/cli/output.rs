//! Human-readable rendering of command results.

use std::io::{self, Write};

use crate::storage::{Commit, Status};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One log entry: `===`, id, timestamp, message, blank line.
pub fn write_log_entry<W: Write>(out: &mut W, commit: &Commit) -> io::Result<()> {
    writeln!(out, "===")?;
    writeln!(out, "Commit {}", commit.id)?;
    writeln!(out, "{}", commit.timestamp.format(TIMESTAMP_FORMAT))?;
    writeln!(out, "{}", commit.message)?;
    writeln!(out)
}

pub fn write_log<W: Write>(out: &mut W, commits: &[Commit]) -> io::Result<()> {
    for commit in commits {
        write_log_entry(out, commit)?;
    }
    Ok(())
}

/// Three sections, each followed by a blank line. The current branch is
/// prefixed with `*`.
pub fn write_status<W: Write>(out: &mut W, status: &Status) -> io::Result<()> {
    writeln!(out, "=== Branches ===")?;
    for branch in &status.branches {
        if *branch == status.current_branch {
            writeln!(out, "*{}", branch)?;
        } else {
            writeln!(out, "{}", branch)?;
        }
    }
    writeln!(out)?;

    writeln!(out, "=== Staged Files ===")?;
    for file in &status.staged {
        writeln!(out, "{}", file)?;
    }
    writeln!(out)?;

    writeln!(out, "=== Files Marked for Removal ===")?;
    for file in &status.removed {
        writeln!(out, "{}", file)?;
    }
    writeln!(out)
}
