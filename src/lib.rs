// src/lib.rs

//! pacpartial
//!
//! Upgrade or install specific packages on a partially-updated Arch Linux
//! system without breaking it.
//!
//! # Architecture
//!
//! - `pactree` supplies relationship trees; each package is queried at most
//!   once per direction per run
//! - The closure resolver expands the requested packages through their
//!   dependencies and dependents until only installed, current packages
//!   remain at the edge
//! - Kept packages are never changed without asking
//! - `pacman -S --needed` performs the actual installation

pub mod config;
mod error;
pub mod packages;
pub mod resolver;
pub mod selection;
pub mod workflow;

pub use config::Settings;
pub use error::{Error, QueryError, Result};
pub use packages::{
    Installer, PackageName, PackageSet, Pacman, Pactree, RelationQuery, SystemSnapshot,
};
pub use resolver::{Closure, ClosureResolver, RelationCache};
pub use selection::{ConflictDecision, ConflictPrompt, InstallPlan, Outcome, TerminalPrompt};
pub use workflow::{Backends, Request};
