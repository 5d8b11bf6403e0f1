//! Confirmation before commands that rewrite the working directory.

use std::io::{self, BufRead, Write};

pub const WARNING: &str = "Warning: this command may alter the files in your working directory. \
Uncommitted changes may be lost.";

/// Ask for confirmation; only an exact `yes` proceeds.
///
/// With `assume_yes` nothing is printed or read.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    write!(out, "{} Are you sure you want to continue? (yes/no) ", WARNING)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim() == "yes")
}
