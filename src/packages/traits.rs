// src/packages/traits.rs

//! Common traits for the package-manager backends
//!
//! The resolver and the selection step only see these traits, so tests can
//! substitute canned trees and recording installers for `pactree` and
//! `pacman`.

use super::PackageSet;
use crate::error::{QueryError, Result};

/// Source of raw dependency trees for single packages
pub trait RelationQuery {
    /// Tree of everything `package` depends on, as printed by the tool
    ///
    /// Fails with [`QueryError::UnknownPackage`] when the package index
    /// does not know the name.
    fn forward_tree(&mut self, package: &str) -> std::result::Result<String, QueryError>;

    /// Tree of everything that depends on `package`
    ///
    /// Fails with [`QueryError::NoReverseDependents`] when there is no
    /// reverse tree, which is the normal answer for uninstalled packages.
    fn reverse_tree(&mut self, package: &str) -> std::result::Result<String, QueryError>;
}

/// Something that can install packages and adjust their install reason
pub trait Installer {
    /// Install or upgrade `packages`, skipping ones already current
    fn install(&mut self, packages: &PackageSet) -> Result<()>;

    /// Mark `packages` as installed as dependencies
    fn mark_as_deps(&mut self, packages: &PackageSet) -> Result<()>;
}
