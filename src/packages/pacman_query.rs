// src/packages/pacman_query.rs

//! Query and drive pacman on Arch Linux systems
//!
//! Relationship trees come from `pactree`, system state from `pacman -Q`
//! queries, and installation goes through `pacman -S --needed`.

use super::traits::{Installer, RelationQuery};
use super::PackageSet;
use crate::error::{Error, QueryError, Result};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tracing::{debug, info};

/// Run a query tool to completion, capturing its output
fn run_tool(tool: &str, args: &[&str]) -> std::result::Result<Output, QueryError> {
    Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| QueryError::ToolUnavailable {
            tool: tool.to_string(),
            source,
        })
}

/// Collect one package name per line
fn lines_to_set(stdout: &[u8]) -> PackageSet {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Check that a tool can be found on PATH
pub fn is_tool_available(tool: &str) -> bool {
    which::which(tool).is_ok()
}

/// `pactree`-backed relationship queries
#[derive(Debug, Clone)]
pub struct Pactree {
    bin: String,
}

/// Whether `stderr` is pactree's report that `package` is not in the
/// database it searched
fn reports_not_found(stderr: &str, package: &str) -> bool {
    let expected = format!("error: package '{}' not found", package);
    stderr.lines().any(|line| line.trim() == expected)
}

impl Pactree {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Run one tree query; `not_found` builds the error for the one failure
    /// that is an answer about the package rather than about the tool
    fn tree(
        &self,
        args: &[&str],
        package: &str,
        not_found: fn(String) -> QueryError,
    ) -> std::result::Result<String, QueryError> {
        let mut argv = args.to_vec();
        argv.push(package);
        let output = run_tool(&self.bin, &argv)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if reports_not_found(&stderr, package) {
                return Err(not_found(package.to_string()));
            }
            return Err(QueryError::ToolFailed {
                tool: format!("{} {} {}", self.bin, args.join(" "), package),
                status: output.status,
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for Pactree {
    fn default() -> Self {
        Self::new("pactree")
    }
}

impl RelationQuery for Pactree {
    fn forward_tree(&mut self, package: &str) -> std::result::Result<String, QueryError> {
        debug!("Querying dependency tree for {}", package);

        // -s: sync databases, so uninstalled packages resolve too
        self.tree(&["-s", "-a"], package, QueryError::UnknownPackage)
    }

    fn reverse_tree(&mut self, package: &str) -> std::result::Result<String, QueryError> {
        debug!("Querying reverse dependency tree for {}", package);

        // Reverse trees only exist in the local database, so an
        // uninstalled package is reported as not found
        self.tree(&["-r", "-a"], package, QueryError::NoReverseDependents)
    }
}

/// State of the local system, captured once before resolution starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemSnapshot {
    /// Everything currently installed
    pub installed: PackageSet,
    /// Everything that would change on a full upgrade
    pub stale: PackageSet,
    /// Installed packages whose install reason is "explicit"
    pub explicit: PackageSet,
}

/// The `pacman` binary, used for snapshot queries and installation
#[derive(Debug, Clone)]
pub struct Pacman {
    bin: String,
}

impl Pacman {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Run a `-Q` query that prints one package name per line
    ///
    /// pacman exits non-zero with no output when a filtered query has no
    /// matches, which just means the set is empty.
    fn query_names(&self, args: &[&str]) -> Result<PackageSet> {
        let output = run_tool(&self.bin, args)?;

        if !output.status.success() {
            if output.stdout.is_empty() && output.stderr.is_empty() {
                debug!("pacman {} matched nothing", args.join(" "));
                return Ok(PackageSet::new());
            }
            return Err(QueryError::ToolFailed {
                tool: format!("{} {}", self.bin, args.join(" ")),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let packages = lines_to_set(&output.stdout);
        debug!("pacman {} listed {} packages", args.join(" "), packages.len());
        Ok(packages)
    }

    /// List all installed package names
    pub fn list_installed(&self) -> Result<PackageSet> {
        self.query_names(&["-Qq"])
    }

    /// List explicitly installed package names
    pub fn list_explicit(&self) -> Result<PackageSet> {
        self.query_names(&["-Qeq"])
    }

    /// List packages with pending upgrades, optionally against another
    /// database directory (such as the one `checkupdates` keeps)
    pub fn list_stale(&self, dbpath: Option<&Path>) -> Result<PackageSet> {
        match dbpath {
            Some(dbpath) => {
                let dbpath = dbpath.to_string_lossy();
                self.query_names(&["-Quq", "--dbpath", &*dbpath])
            }
            None => self.query_names(&["-Quq"]),
        }
    }

    /// Capture installed and stale sets; explicit names are only needed
    /// when some packages will be re-marked as dependencies
    pub fn snapshot(&self, dbpath: Option<&Path>, with_explicit: bool) -> Result<SystemSnapshot> {
        let installed = self.list_installed()?;
        let stale = self.list_stale(dbpath)?;
        let explicit = if with_explicit {
            self.list_explicit()?
        } else {
            PackageSet::new()
        };

        info!(
            "{} installed packages, {} with pending changes",
            installed.len(),
            stale.len()
        );

        Ok(SystemSnapshot {
            installed,
            stale,
            explicit,
        })
    }

    fn run_status(&self, args: &[&str], packages: &PackageSet, quiet: bool) -> Result<()> {
        let mut command = Command::new(&self.bin);
        command.args(args).args(packages);
        if quiet {
            command.stdout(Stdio::null());
        }

        let status = command.status().map_err(|source| QueryError::ToolUnavailable {
            tool: self.bin.clone(),
            source,
        })?;

        if !status.success() {
            return Err(Error::CommandFailed {
                command: format!("{} {}", self.bin, args.join(" ")),
                status,
            });
        }

        Ok(())
    }
}

impl Default for Pacman {
    fn default() -> Self {
        Self::new("pacman")
    }
}

impl Installer for Pacman {
    fn install(&mut self, packages: &PackageSet) -> Result<()> {
        info!("Installing {} packages", packages.len());
        self.run_status(&["-S", "--needed"], packages, false)
    }

    fn mark_as_deps(&mut self, packages: &PackageSet) -> Result<()> {
        info!("Marking {} packages as dependencies", packages.len());
        self.run_status(&["-D", "--asdeps"], packages, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_to_set() {
        let set = lines_to_set(b"glibc\n  bash \n\nzlib\nbash\n");

        assert_eq!(set.len(), 3);
        assert!(set.contains("bash"));
        assert_eq!(set.iter().next().map(String::as_str), Some("bash"));
    }

    /// Write an executable shell script standing in for pacman or pactree
    fn fake_tool(dir: &tempfile::TempDir, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("tool");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    const NOT_FOUND: &str = "echo \"error: package '$3' not found\" >&2; exit 1";
    const BROKEN: &str = "echo 'error: failed to initialize alpm library' >&2; exit 1";

    #[test]
    fn test_pacman_no_matches_is_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let pacman = Pacman::new(fake_tool(&dir, "exit 1"));

        assert!(pacman.list_stale(None).unwrap().is_empty());
    }

    #[test]
    fn test_pacman_error_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pacman = Pacman::new(fake_tool(
            &dir,
            "echo 'error: could not open database' >&2; exit 1",
        ));

        let err = pacman.list_installed().unwrap_err();
        match err {
            Error::Query(QueryError::ToolFailed { stderr, .. }) => {
                assert_eq!(stderr, "error: could not open database");
            }
            other => panic!("expected ToolFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_pacman_lists_names() {
        let dir = tempfile::tempdir().unwrap();
        let pacman = Pacman::new(fake_tool(&dir, "printf 'glibc\\nbash\\n'"));

        let installed = pacman.list_installed().unwrap();
        assert_eq!(installed.len(), 2);
        assert!(installed.contains("glibc"));
    }

    #[test]
    fn test_pactree_not_found_is_package_local() {
        let dir = tempfile::tempdir().unwrap();
        let mut pactree = Pactree::new(fake_tool(&dir, NOT_FOUND));

        let forward = pactree.forward_tree("ghost").unwrap_err();
        assert!(matches!(forward, QueryError::UnknownPackage(ref name) if name == "ghost"));

        let reverse = pactree.reverse_tree("ghost").unwrap_err();
        assert!(matches!(reverse, QueryError::NoReverseDependents(ref name) if name == "ghost"));
    }

    #[test]
    fn test_pactree_other_failure_is_not_masked() {
        let dir = tempfile::tempdir().unwrap();
        let mut pactree = Pactree::new(fake_tool(&dir, BROKEN));

        for err in [
            pactree.forward_tree("bash").unwrap_err(),
            pactree.reverse_tree("bash").unwrap_err(),
        ] {
            assert!(!err.is_package_local());
            assert!(matches!(err, QueryError::ToolFailed { .. }));
        }
    }

    #[test]
    fn test_broken_pactree_stops_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let pactree = Pactree::new(fake_tool(&dir, BROKEN));
        let mut cache = crate::resolver::RelationCache::new(pactree);

        assert!(cache.related_to("bash").is_err());
    }

    #[test]
    fn test_pactree_success_returns_tree() {
        let dir = tempfile::tempdir().unwrap();
        let mut pactree = Pactree::new(fake_tool(&dir, "printf 'bash\\n`-glibc\\n'"));

        assert_eq!(pactree.forward_tree("bash").unwrap(), "bash\n`-glibc\n");
    }

    #[test]
    fn test_missing_tool_is_not_a_package_failure() {
        let mut pactree = Pactree::new("pacpartial-no-such-tool");

        let err = pactree.forward_tree("bash").unwrap_err();
        assert!(matches!(err, QueryError::ToolUnavailable { .. }));
        assert!(!err.is_package_local());
    }

    #[test]
    fn test_is_tool_available() {
        // This test just ensures the function runs without panic
        let _ = is_tool_available("pacman");
        assert!(!is_tool_available("pacpartial-no-such-tool"));
    }
}
