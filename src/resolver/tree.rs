// src/resolver/tree.rs

//! Parser for indentation-encoded dependency trees
//!
//! `pactree` prints one package per line in depth-first order, nesting
//! each level with two drawing characters:
//!
//! ```text
//! bash
//! |-readline
//! | `-ncurses
//! `-glibc
//! ```
//!
//! Every non-root line is attributed to its immediate parent, so a single
//! tree yields the depth-1 neighbors of every inner node it contains.

use thiserror::Error;
use tracing::debug;

/// Characters `pactree` uses to draw the tree, in ASCII (`-a`) and
/// Unicode mode
const TREE_DRAWING: &[char] = &['|', '`', '-', ' ', '│', '├', '└', '─'];

/// Which relationship a tree describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Dependencies of the root
    Forward,
    /// Packages that depend on the root
    Reverse,
}

/// One parent -> child line pair from a tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeEdge {
    pub parent: String,
    pub child: String,
}

/// A tree reduced to its roots and immediate-parent edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTree {
    /// Level-0 names in the order they appeared
    pub roots: Vec<String>,
    /// One edge per non-root line, in input order
    pub edges: Vec<TreeEdge>,
}

impl ParsedTree {
    /// The first root, normally the package the tree was requested for
    pub fn root(&self) -> Option<&str> {
        self.roots.first().map(String::as_str)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// No package line at all; the queried package was not found
    #[error("tree output contains no packages")]
    Empty,
}

/// Split a line into its nesting level and package name.
///
/// Anything after the first token (e.g. `sh provides sh`) is dropped.
fn split_line(line: &str) -> Option<(usize, &str)> {
    let text = line.trim_start_matches(TREE_DRAWING);
    let name = text.split_whitespace().next()?;
    let prefix = &line[..line.len() - text.len()];
    Some((prefix.chars().count() / 2, name))
}

/// Parse one tree into roots and immediate-parent edges
pub fn parse_tree(text: &str) -> Result<ParsedTree, TreeError> {
    let mut tree = ParsedTree::default();
    let mut ancestors: Vec<&str> = Vec::new();
    let mut previous: Option<(usize, &str)> = None;

    for line in text.lines() {
        let Some((level, name)) = split_line(line) else {
            continue;
        };

        if level == 0 {
            ancestors.clear();
            tree.roots.push(name.to_string());
            previous = Some((0, name));
            continue;
        }

        let Some((previous_level, previous_name)) = previous else {
            debug!("Skipping tree line before any root: {:?}", line);
            continue;
        };

        if level > previous_level {
            ancestors.push(previous_name);
        } else if level < previous_level {
            // may fall several levels at once
            ancestors.truncate(level);
        }

        let Some(parent) = ancestors.last() else {
            debug!("Skipping tree line without a parent: {:?}", line);
            continue;
        };

        tree.edges.push(TreeEdge {
            parent: parent.to_string(),
            child: name.to_string(),
        });
        previous = Some((level, name));
    }

    if tree.roots.is_empty() {
        return Err(TreeError::Empty);
    }

    Ok(tree)
}
