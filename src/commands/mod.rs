// src/commands/mod.rs
//! Command handlers for the pacpartial CLI

mod partial;

pub use partial::cmd_partial;

use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::Shell;

/// Print a completion script for `shell` to stdout
pub fn cmd_completions(shell: Shell) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "pacpartial", &mut std::io::stdout());
}
