// src/cli.rs
//! CLI definitions for pacpartial
//!
//! This module contains the command-line interface definition using clap.
//! The run itself is implemented in the `commands` module.

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pacpartial")]
#[command(author = "pacpartial Contributors")]
#[command(version)]
#[command(
    about = "Intelligently upgrade or install specific packages on a partially-updated system",
    long_about = None
)]
pub struct Cli {
    /// Packages to install or upgrade
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Update all packages (honours -k)
    #[arg(short = 'A', long)]
    pub all: bool,

    /// Output in more detail
    #[arg(short, long)]
    pub verbose: bool,

    /// Use checkupdates' default temporary database (implies -n)
    #[arg(short, long)]
    pub checkupdates: bool,

    /// Simulate; don't install anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep this package from being updated or installed (can be specified multiple times)
    #[arg(short, long, value_name = "PACKAGE")]
    pub keep: Vec<String>,

    /// Install all succeeding packages as dependencies
    #[arg(short = 'D', long, value_name = "PACKAGE", num_args = 1..)]
    pub asdeps: Vec<String>,

    /// Settings file
    #[arg(long, value_name = "PATH", default_value = pacpartial::config::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Dry run was requested directly or implied by --checkupdates
    pub fn is_dry_run(&self) -> bool {
        self.dry_run || self.checkupdates
    }
}
