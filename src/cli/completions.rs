//! Shell completion scripts

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};

use crate::cli::args::Cli;

/// Write the completion script for `shell` to `out`.
pub fn write_to(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, crate::APP_NAME, out);
}

/// Print the completion script to stdout.
pub fn print(shell: Shell) {
    write_to(shell, &mut io::stdout());
}
