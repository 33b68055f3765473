// src/commands/partial.rs
//! The partial upgrade command

use crate::cli::Cli;
use anyhow::{Context, Result};
use pacpartial::packages::pacman_query::is_tool_available;
use pacpartial::workflow::{self, Backends, Request};
use pacpartial::{Outcome, PackageSet, Pacman, Pactree, RelationCache, Settings, TerminalPrompt};
use std::process::ExitCode;
use tracing::{debug, info};

/// Gather the system snapshot and settings, then run one partial upgrade
pub fn cmd_partial(cli: &Cli) -> Result<ExitCode> {
    let settings = Settings::load(&cli.config)?;
    debug!("Settings: {:?}", settings);

    if !is_tool_available(&settings.pacman_bin) {
        anyhow::bail!("{} not found. Is pacman installed?", settings.pacman_bin);
    }
    if !is_tool_available(&settings.pactree_bin) {
        anyhow::bail!(
            "{} not found. It is provided by pacman-contrib.",
            settings.pactree_bin
        );
    }

    let dbpath = if cli.checkupdates {
        let login = std::env::var("LOGNAME").context("LOGNAME is not set")?;
        Some(settings.checkupdates_db(&login))
    } else {
        None
    };

    let mut pacman = Pacman::new(&settings.pacman_bin);
    let snapshot = pacman
        .snapshot(dbpath.as_deref(), !cli.asdeps.is_empty())
        .context("Failed to query the pacman database")?;

    let mut keep: PackageSet = cli.keep.iter().cloned().collect();
    keep.extend(settings.keep_list());

    let request = Request {
        targets: cli.packages.iter().cloned().collect(),
        keep,
        always: settings.always_list(),
        asdeps: cli.asdeps.iter().cloned().collect(),
        all: cli.all,
        dry_run: cli.is_dry_run(),
    };
    info!(
        "{} targets, {} kept, {} always-update candidates",
        request.targets.len(),
        request.keep.len(),
        request.always.len()
    );

    let mut cache = RelationCache::new(Pactree::new(&settings.pactree_bin));
    let mut prompt = TerminalPrompt::stdio();
    let outcome = workflow::run(
        &request,
        &snapshot,
        Backends {
            cache: &mut cache,
            installer: &mut pacman,
            prompt: &mut prompt,
        },
    )?;

    let stats = cache.stats();
    debug!(
        "pactree ran {} times ({} forward, {} reverse)",
        stats.total(),
        stats.forward_queries,
        stats.reverse_queries
    );

    match outcome {
        Outcome::Proceed(_) => Ok(ExitCode::SUCCESS),
        Outcome::DryRun(packages) => {
            for name in &packages {
                println!("{}", name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Abort => {
            println!("Nothing done.");
            Ok(ExitCode::FAILURE)
        }
        Outcome::NothingSelected => {
            println!("No packages selected!");
            Ok(ExitCode::FAILURE)
        }
    }
}
