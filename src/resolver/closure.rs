// src/resolver/closure.rs

//! Fixpoint search for packages implicated by a request
//!
//! Starting from the requested packages, each round looks at the direct
//! dependencies and dependents of every package not yet visited, keeps the
//! ones that are not installed-and-current, and continues from those. The
//! search stops when a round brings no unvisited package.

use super::cache::RelationCache;
use crate::error::Result;
use crate::packages::{PackageSet, RelationQuery};
use tracing::debug;

/// Sizes observed at the end of one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTrace {
    /// Packages expanded in this round
    pub frontier: usize,
    /// Total packages found so far
    pub found: usize,
    /// Total packages visited so far
    pub visited: usize,
}

/// Result of one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    /// Every package found to be uninstalled, stale or forced
    pub missing: PackageSet,
    /// Every package that was expanded
    pub visited: PackageSet,
    pub rounds: Vec<RoundTrace>,
}

/// Closure search over a relationship cache
pub struct ClosureResolver<'a, Q> {
    cache: &'a mut RelationCache<Q>,
    /// Installed and not stale; never counts as missing
    current: PackageSet,
    always: &'a PackageSet,
}

impl<'a, Q: RelationQuery> ClosureResolver<'a, Q> {
    pub fn new(
        cache: &'a mut RelationCache<Q>,
        installed: &PackageSet,
        stale: &PackageSet,
        always: &'a PackageSet,
    ) -> Self {
        Self {
            cache,
            current: installed.difference(stale).cloned().collect(),
            always,
        }
    }

    /// Keep what is uninstalled or stale, plus the forced packages
    pub fn filter_missing(&self, related: &PackageSet) -> PackageSet {
        related
            .iter()
            .filter(|name| !self.current.contains(*name))
            .chain(self.always.iter())
            .cloned()
            .collect()
    }

    /// Find every package implicated by `seed`
    pub fn resolve_missing(&mut self, seed: &PackageSet) -> Result<Closure> {
        let mut current = seed.clone();
        let mut found = PackageSet::new();
        let mut visited = PackageSet::new();
        let mut rounds = Vec::new();

        loop {
            let frontier: PackageSet = current.difference(&visited).cloned().collect();
            if frontier.is_empty() {
                break;
            }
            debug!("Current set size: {}", frontier.len());

            // related_to never returns the queried package itself
            let mut related = frontier.clone();
            for package in &frontier {
                related.extend(self.cache.related_to(package)?.iter().cloned());
            }

            let missing = self.filter_missing(&related);
            found.extend(missing.iter().cloned());
            visited.extend(frontier.iter().cloned());

            rounds.push(RoundTrace {
                frontier: frontier.len(),
                found: found.len(),
                visited: visited.len(),
            });
            current = missing;
        }

        debug!(
            "Closure complete after {} rounds: {} missing, {} visited",
            rounds.len(),
            found.len(),
            visited.len()
        );

        Ok(Closure {
            missing: found,
            visited,
            rounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use std::collections::HashMap;

    /// Forward-only graph given as adjacency lists
    struct Graph(HashMap<String, Vec<String>>);

    impl Graph {
        fn new(edges: &[(&str, &[&str])]) -> Self {
            Self(
                edges
                    .iter()
                    .map(|(from, to)| {
                        (from.to_string(), to.iter().map(|s| s.to_string()).collect())
                    })
                    .collect(),
            )
        }
    }

    impl RelationQuery for Graph {
        fn forward_tree(&mut self, package: &str) -> std::result::Result<String, QueryError> {
            let mut out = format!("{}\n", package);
            for dep in self.0.get(package).into_iter().flatten() {
                out.push_str(&format!("`-{}\n", dep));
            }
            Ok(out)
        }

        fn reverse_tree(&mut self, package: &str) -> std::result::Result<String, QueryError> {
            Err(QueryError::NoReverseDependents(package.to_string()))
        }
    }

    fn names(list: &[&str]) -> PackageSet {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_stale_seed_without_edges() {
        let mut cache = RelationCache::new(Graph::new(&[]));
        let always = PackageSet::new();
        let installed = names(&["x"]);
        let stale = names(&["x"]);
        let mut resolver = ClosureResolver::new(&mut cache, &installed, &stale, &always);

        let closure = resolver.resolve_missing(&names(&["x"])).unwrap();

        assert_eq!(closure.missing, names(&["x"]));
        assert_eq!(closure.rounds.len(), 1);
    }

    #[test]
    fn test_stops_at_current_packages() {
        // a -> b -> c, with b installed and current
        let mut cache = RelationCache::new(Graph::new(&[("a", &["b"]), ("b", &["c"])]));
        let always = PackageSet::new();
        let installed = names(&["b", "c"]);
        let stale = PackageSet::new();
        let mut resolver = ClosureResolver::new(&mut cache, &installed, &stale, &always);

        let closure = resolver.resolve_missing(&names(&["a"])).unwrap();

        assert_eq!(closure.missing, names(&["a"]));
        assert!(!closure.visited.contains("b"));
    }

    #[test]
    fn test_walks_through_stale_packages() {
        let mut cache = RelationCache::new(Graph::new(&[("a", &["b"]), ("b", &["c"])]));
        let always = PackageSet::new();
        let installed = names(&["b", "c"]);
        let stale = names(&["b", "c"]);
        let mut resolver = ClosureResolver::new(&mut cache, &installed, &stale, &always);

        let closure = resolver.resolve_missing(&names(&["a"])).unwrap();

        assert_eq!(closure.missing, names(&["a", "b", "c"]));
    }

    #[test]
    fn test_always_is_added_every_time() {
        let mut cache = RelationCache::new(Graph::new(&[]));
        let always = names(&["archlinux-keyring"]);
        let installed = names(&["archlinux-keyring", "a"]);
        let stale = names(&["archlinux-keyring"]);
        let mut resolver = ClosureResolver::new(&mut cache, &installed, &stale, &always);

        let closure = resolver.resolve_missing(&names(&["a"])).unwrap();

        assert!(closure.missing.contains("archlinux-keyring"));
        // a itself is current, so only the forced package is missing
        assert!(!closure.missing.contains("a"));
    }

    #[test]
    fn test_empty_seed() {
        let mut cache = RelationCache::new(Graph::new(&[]));
        let always = names(&["k"]);
        let mut resolver =
            ClosureResolver::new(&mut cache, &PackageSet::new(), &PackageSet::new(), &always);

        let closure = resolver.resolve_missing(&PackageSet::new()).unwrap();

        assert!(closure.missing.is_empty());
        assert!(closure.rounds.is_empty());
    }

    #[test]
    fn test_filter_missing() {
        let mut cache = RelationCache::new(Graph::new(&[]));
        let always = names(&["forced"]);
        let installed = names(&["current", "old"]);
        let stale = names(&["old", "new"]);
        let resolver = ClosureResolver::new(&mut cache, &installed, &stale, &always);

        let missing = resolver.filter_missing(&names(&["current", "old", "new", "absent"]));

        assert_eq!(missing, names(&["absent", "forced", "new", "old"]));
    }
}
