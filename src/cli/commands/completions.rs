//! Shell completion scripts.

use crate::cli::{Cli, Shell};
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{generate, shells, Generator};
use std::io::{self, Write};

const BIN_NAME: &str = "navcat";

/// Write the completion script for `shell` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn execute(shell: &Shell) -> Result<()> {
    let mut out = io::stdout().lock();
    match shell {
        Shell::Bash => render(shells::Bash, &mut out),
        Shell::Zsh => render(shells::Zsh, &mut out),
        Shell::Fish => render(shells::Fish, &mut out),
        Shell::PowerShell => render(shells::PowerShell, &mut out),
        Shell::Elvish => render(shells::Elvish, &mut out),
    }
    out.flush()?;
    Ok(())
}

fn render<G: Generator>(generator: G, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(generator, &mut cmd, BIN_NAME, out);
}
