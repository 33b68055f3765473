// tests/common/mod.rs

//! Shared fakes for integration tests: an in-memory package index that
//! renders `pactree`-style trees, a recording installer and a scripted
//! operator.

#![allow(dead_code)]

use pacpartial::{
    ConflictDecision, ConflictPrompt, Installer, PackageSet, QueryError, RelationQuery, Result,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Build a package set from string literals
pub fn names(list: &[&str]) -> PackageSet {
    list.iter().map(|s| s.to_string()).collect()
}

/// In-memory dependency graph answering tree queries
#[derive(Debug, Default)]
pub struct FakeIndex {
    /// package -> direct dependencies
    depends: BTreeMap<String, BTreeSet<String>>,
    /// Packages the index knows about
    known: BTreeSet<String>,
    /// Packages with a local reverse tree
    installed: BTreeSet<String>,
    pub forward_calls: HashMap<String, usize>,
    pub reverse_calls: HashMap<String, usize>,
}

impl FakeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a package and its direct dependencies
    pub fn package(mut self, name: &str, deps: &[&str]) -> Self {
        self.known.insert(name.to_string());
        for dep in deps {
            self.known.insert(dep.to_string());
        }
        self.depends
            .entry(name.to_string())
            .or_default()
            .extend(deps.iter().map(|s| s.to_string()));
        self
    }

    /// Mark packages as installed so they have reverse trees
    pub fn installed(mut self, list: &[&str]) -> Self {
        self.installed.extend(list.iter().map(|s| s.to_string()));
        self
    }

    fn dependents(&self, name: &str) -> BTreeSet<String> {
        self.depends
            .iter()
            .filter(|(_, deps)| deps.contains(name))
            .map(|(pkg, _)| pkg.clone())
            .collect()
    }

    /// Render a tree the way `pactree -a` does, not repeating a package
    /// on the current branch
    fn render(&self, root: &str, children: &dyn Fn(&str) -> BTreeSet<String>) -> String {
        fn walk(
            name: &str,
            depth: usize,
            branch: &mut Vec<String>,
            children: &dyn Fn(&str) -> BTreeSet<String>,
            out: &mut String,
        ) {
            if depth > 0 {
                out.push_str(&"| ".repeat(depth - 1));
                out.push_str("`-");
            }
            out.push_str(name);
            out.push('\n');

            branch.push(name.to_string());
            for child in children(name) {
                if !branch.contains(&child) {
                    walk(&child, depth + 1, branch, children, out);
                }
            }
            branch.pop();
        }

        let mut out = String::new();
        walk(root, 0, &mut Vec::new(), children, &mut out);
        out
    }

    pub fn forward_count(&self, name: &str) -> usize {
        self.forward_calls.get(name).copied().unwrap_or(0)
    }

    pub fn reverse_count(&self, name: &str) -> usize {
        self.reverse_calls.get(name).copied().unwrap_or(0)
    }
}

impl RelationQuery for FakeIndex {
    fn forward_tree(&mut self, package: &str) -> std::result::Result<String, QueryError> {
        *self.forward_calls.entry(package.to_string()).or_default() += 1;
        if !self.known.contains(package) {
            return Err(QueryError::UnknownPackage(package.to_string()));
        }
        let deps = |name: &str| self.depends.get(name).cloned().unwrap_or_default();
        Ok(self.render(package, &deps))
    }

    fn reverse_tree(&mut self, package: &str) -> std::result::Result<String, QueryError> {
        *self.reverse_calls.entry(package.to_string()).or_default() += 1;
        if !self.installed.contains(package) {
            return Err(QueryError::NoReverseDependents(package.to_string()));
        }
        let dependents = |name: &str| self.dependents(name);
        Ok(self.render(package, &dependents))
    }
}

/// Installer that only records what it was asked to do
#[derive(Debug, Default)]
pub struct RecordingInstaller {
    pub installs: Vec<PackageSet>,
    pub marked: Vec<PackageSet>,
}

impl Installer for RecordingInstaller {
    fn install(&mut self, packages: &PackageSet) -> Result<()> {
        self.installs.push(packages.clone());
        Ok(())
    }

    fn mark_as_deps(&mut self, packages: &PackageSet) -> Result<()> {
        self.marked.push(packages.clone());
        Ok(())
    }
}

/// Operator giving a fixed answer and remembering what was shown
#[derive(Debug)]
pub struct ScriptedPrompt {
    answer: ConflictDecision,
    pub shown: Vec<PackageSet>,
}

impl ScriptedPrompt {
    pub fn answering(answer: ConflictDecision) -> Self {
        Self {
            answer,
            shown: Vec::new(),
        }
    }
}

impl ConflictPrompt for ScriptedPrompt {
    fn ask(&mut self, conflicts: &PackageSet) -> Result<ConflictDecision> {
        self.shown.push(conflicts.clone());
        Ok(self.answer)
    }
}
