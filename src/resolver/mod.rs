// src/resolver/mod.rs

//! Dependency-closure resolution
//!
//! This module finds the packages that have to move together with a
//! request on a partially-updated system:
//!
//! - [`tree`] turns `pactree` output into parent/child edges
//! - [`cache`] memoizes depth-1 relationships per package
//! - [`closure`] expands a seed set to its fixpoint
//!
//! The cache is created by the caller and lent to the resolver, so nothing
//! about earlier lookups survives beyond the cache's owner.

pub mod cache;
pub mod closure;
pub mod tree;

pub use cache::{CacheStats, RelationCache, RelationEntry};
pub use closure::{Closure, ClosureResolver, RoundTrace};
pub use tree::{parse_tree, Direction, ParsedTree, TreeEdge, TreeError};
