// src/workflow.rs

//! One partial-upgrade run, from request to installer

use crate::error::Result;
use crate::packages::{Installer, PackageSet, RelationQuery, SystemSnapshot};
use crate::resolver::{ClosureResolver, RelationCache};
use crate::selection::{self, ConflictPrompt, Outcome, Selection};
use tracing::info;

/// What the operator asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub targets: PackageSet,
    pub keep: PackageSet,
    /// Configured always-update packages; only stale ones take effect
    pub always: PackageSet,
    pub asdeps: PackageSet,
    /// Update every stale package
    pub all: bool,
    pub dry_run: bool,
}

/// Collaborators used by a run
pub struct Backends<'a, Q> {
    pub cache: &'a mut RelationCache<Q>,
    pub installer: &'a mut dyn Installer,
    pub prompt: &'a mut dyn ConflictPrompt,
}

/// Resolve, select and (unless dry-running) install
///
/// `always` is taken from the stale set once, so a package that becomes
/// stale during the run is not picked up.
pub fn run<Q: RelationQuery>(
    request: &Request,
    snapshot: &SystemSnapshot,
    backends: Backends<'_, Q>,
) -> Result<Outcome> {
    let Backends {
        cache,
        installer,
        prompt,
    } = backends;

    let mut targets = request.targets.clone();
    if request.all {
        targets.extend(snapshot.stale.iter().cloned());
    }
    let always: PackageSet = request
        .always
        .intersection(&snapshot.stale)
        .cloned()
        .collect();

    let selection = Selection {
        keep: &request.keep,
        asdeps: &request.asdeps,
        installed: &snapshot.installed,
        stale: &snapshot.stale,
        explicit: &snapshot.explicit,
        dry_run: request.dry_run,
    };

    let outcome = if snapshot.stale.is_empty() {
        println!("Up to date (according to DB). Starting install.");
        selection.decide(&targets, &PackageSet::new(), prompt)?
    } else {
        println!("Finding missing & related packages...");
        let missing = if request.all {
            PackageSet::new()
        } else {
            let mut resolver =
                ClosureResolver::new(cache, &snapshot.installed, &snapshot.stale, &always);
            resolver.resolve_missing(&targets)?.missing
        };

        if missing.iter().any(|name| snapshot.installed.contains(name)) {
            println!("Found. Starting update.");
            selection.decide(&targets, &missing, prompt)?
        } else {
            println!("None found. Starting install.");
            selection.decide(&targets, &PackageSet::new(), prompt)?
        }
    };

    if let Outcome::Proceed(plan) = &outcome {
        info!(
            "Installing {} packages, marking {} as dependencies",
            plan.install.len(),
            plan.mark_as_deps.len()
        );
        selection::execute(plan, installer)?;
    }

    Ok(outcome)
}
