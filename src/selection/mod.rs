// src/selection/mod.rs

//! Final install-set selection and keep-conflict adjudication
//!
//! Decisions are made in a fixed order: dependency-marked packages join the
//! primary set, kept packages that would change are put to the operator,
//! and only then does dry-run short-circuit the install.

mod prompt;

pub use prompt::{ConflictDecision, ConflictPrompt, TerminalPrompt};

use crate::error::Result;
use crate::packages::{Installer, PackageSet};
use tracing::info;

/// Packages handed to the installer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    /// Arguments for `pacman -S --needed`
    pub install: PackageSet,
    /// Newly installed packages to mark as dependencies afterwards
    pub mark_as_deps: PackageSet,
}

/// What the selection step decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Install these packages
    Proceed(InstallPlan),
    /// Dry run; these packages would be installed
    DryRun(PackageSet),
    /// The operator declined; nothing was done
    Abort,
    /// Nothing was requested
    NothingSelected,
}

/// Inputs that stay fixed for the whole selection
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub keep: &'a PackageSet,
    pub asdeps: &'a PackageSet,
    pub installed: &'a PackageSet,
    pub stale: &'a PackageSet,
    pub explicit: &'a PackageSet,
    pub dry_run: bool,
}

impl Selection<'_> {
    /// Kept packages that the given sets would touch
    pub fn conflicts(&self, primary: &PackageSet, secondary: &PackageSet) -> PackageSet {
        primary
            .union(secondary)
            .filter(|name| self.keep.contains(*name))
            .cloned()
            .collect()
    }

    /// Reconcile requested (`primary`) and implicated (`secondary`)
    /// packages with the keep list
    pub fn decide(
        &self,
        primary: &PackageSet,
        secondary: &PackageSet,
        prompt: &mut dyn ConflictPrompt,
    ) -> Result<Outcome> {
        let mut primary: PackageSet = primary.union(self.asdeps).cloned().collect();
        let mut secondary = secondary.clone();

        if primary.is_empty() && !self.dry_run {
            return Ok(Outcome::NothingSelected);
        }

        let conflicts = self.conflicts(&primary, &secondary);
        if !conflicts.is_empty() {
            match prompt.ask(&conflicts)? {
                ConflictDecision::Proceed => {
                    info!("Proceeding with {} kept packages", conflicts.len());
                }
                ConflictDecision::Keep => {
                    primary.retain(|name| !conflicts.contains(name));
                    secondary.retain(|name| !conflicts.contains(name));
                }
                ConflictDecision::Abort => return Ok(Outcome::Abort),
            }
        }

        if self.dry_run {
            return Ok(Outcome::DryRun(primary.union(&secondary).cloned().collect()));
        }

        // Uninstalled members of the secondary set get pulled in as
        // dependencies; only upgrades have to be named. pacman keeps the
        // install reason of upgraded packages.
        let install: PackageSet = primary
            .iter()
            .chain(secondary.intersection(self.stale))
            .cloned()
            .collect();

        for name in self.asdeps.intersection(self.explicit) {
            info!("{} is explicitly installed; its install reason is left unchanged", name);
        }
        let mark_as_deps = self.asdeps.difference(self.installed).cloned().collect();

        Ok(Outcome::Proceed(InstallPlan {
            install,
            mark_as_deps,
        }))
    }
}

/// Run an install plan against the installer
pub fn execute(plan: &InstallPlan, installer: &mut dyn Installer) -> Result<()> {
    installer.install(&plan.install)?;

    // Only packages this run installed are re-marked, so existing
    // install reasons are never rewritten
    if !plan.mark_as_deps.is_empty() {
        installer.mark_as_deps(&plan.mark_as_deps)?;
    }

    Ok(())
}
