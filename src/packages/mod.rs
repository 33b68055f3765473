// src/packages/mod.rs

//! Package-manager integration
//!
//! Package names are plain strings compared exactly; no version or
//! repository qualifier is ever attached. Sets are ordered so that
//! printed lists and installer arguments are deterministic.

use std::collections::BTreeSet;

pub mod pacman_query;
pub mod traits;

pub use pacman_query::{Pacman, Pactree, SystemSnapshot};
pub use traits::{Installer, RelationQuery};

/// Name of a package, unique within a run
pub type PackageName = String;

/// An ordered set of package names
pub type PackageSet = BTreeSet<PackageName>;
