// src/resolver/cache.rs

//! Memoized package relationship table
//!
//! Tree queries are expensive (a process spawn plus a recursive walk of the
//! package database), so each entry records which directions are already
//! known. A full tree answers the direction for every inner node in it,
//! which is why one query usually resolves many entries at once.

use super::tree::{self, Direction, ParsedTree, TreeError};
use crate::error::Result;
use crate::packages::{PackageSet, RelationQuery};
use std::collections::HashMap;
use tracing::{debug, warn};

/// What is known about one package's neighbors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationEntry {
    /// Direct dependencies are all in `neighbors`
    pub deps_resolved: bool,
    /// Direct dependents are all in `neighbors`
    pub rev_deps_resolved: bool,
    /// Union of direct dependencies and direct dependents
    pub neighbors: PackageSet,
}

impl RelationEntry {
    fn mark_resolved(&mut self, direction: Direction) {
        match direction {
            Direction::Forward => self.deps_resolved = true,
            Direction::Reverse => self.rev_deps_resolved = true,
        }
    }
}

/// Counts of external queries issued so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub forward_queries: usize,
    pub reverse_queries: usize,
}

impl CacheStats {
    pub fn total(&self) -> usize {
        self.forward_queries + self.reverse_queries
    }
}

/// Relationship table backed by a [`RelationQuery`]
#[derive(Debug)]
pub struct RelationCache<Q> {
    query: Q,
    entries: HashMap<String, RelationEntry>,
    stats: CacheStats,
}

impl<Q: RelationQuery> RelationCache<Q> {
    pub fn new(query: Q) -> Self {
        Self {
            query,
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Look at an entry without triggering any query
    pub fn entry(&self, package: &str) -> Option<&RelationEntry> {
        self.entries.get(package)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    fn entry_mut(&mut self, package: &str) -> &mut RelationEntry {
        self.entries.entry(package.to_string()).or_default()
    }

    /// Attribute every edge of `tree` to its parent's entry
    pub fn merge_tree(&mut self, tree: &ParsedTree, direction: Direction) {
        for root in &tree.roots {
            self.entry_mut(root).mark_resolved(direction);
        }

        for edge in &tree.edges {
            let entry = self.entry_mut(&edge.parent);
            entry.mark_resolved(direction);
            entry.neighbors.insert(edge.child.clone());
        }
    }

    /// Parse a raw tree for `package` and merge it
    ///
    /// When the tool printed a different root (e.g. `bash` for a query on
    /// `sh`), the root is recorded as a neighbor of the queried name.
    fn merge_output(
        &mut self,
        package: &str,
        output: &str,
        direction: Direction,
    ) -> std::result::Result<(), TreeError> {
        let tree = tree::parse_tree(output)?;
        self.merge_tree(&tree, direction);

        let entry = self.entry_mut(package);
        entry.mark_resolved(direction);
        if let Some(root) = tree.root()
            && root != package
        {
            entry.neighbors.insert(root.to_string());
        }

        Ok(())
    }

    fn resolve_forward(&mut self, package: &str) -> Result<()> {
        self.stats.forward_queries += 1;

        let output = match self.query.forward_tree(package) {
            Ok(output) => output,
            Err(e) if e.is_package_local() => {
                warn!("Cannot find {}.", package);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(TreeError::Empty) = self.merge_output(package, &output, Direction::Forward) {
            // Same as the tool not knowing the package; retried next time
            warn!("Cannot find {}.", package);
        }

        Ok(())
    }

    fn resolve_reverse(&mut self, package: &str) -> Result<()> {
        self.stats.reverse_queries += 1;

        let output = match self.query.reverse_tree(package) {
            Ok(output) => output,
            Err(e) if e.is_package_local() => {
                debug!("{} not installed, reverse deps skipped.", package);
                self.entry_mut(package).rev_deps_resolved = true;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(TreeError::Empty) = self.merge_output(package, &output, Direction::Reverse) {
            debug!("{} has an empty reverse tree", package);
            self.entry_mut(package).rev_deps_resolved = true;
        }

        Ok(())
    }

    /// Direct dependencies and dependents of `package`
    ///
    /// Unknown packages and packages without dependents are not errors;
    /// the returned set is then simply partial. Only a broken query tool
    /// is reported as an error.
    pub fn related_to(&mut self, package: &str) -> Result<&PackageSet> {
        debug!("Finding related for {}...", package);

        let entry = self.entry_mut(package);
        let (deps_resolved, rev_deps_resolved) = (entry.deps_resolved, entry.rev_deps_resolved);

        if !deps_resolved {
            self.resolve_forward(package)?;
        }
        if !rev_deps_resolved {
            self.resolve_reverse(package)?;
        }

        Ok(&self.entry_mut(package).neighbors)
    }
}
