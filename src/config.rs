// src/config.rs

//! Settings and package list files
//!
//! Two flat list files (one package per line) contribute kept and
//! always-updated packages. An optional TOML settings file can move those
//! files and change the tools being run:
//!
//! ```toml
//! keep_file = "/etc/pacman.d/partial_keep"
//! always_file = "/etc/pacman.d/partial_always"
//! always = ["archlinux-keyring"]
//! pacman_bin = "pacman"
//! pactree_bin = "pactree"
//! checkupdates_db_prefix = "/tmp/checkup-db-"
//! ```

use crate::error::{Error, Result};
use crate::packages::PackageSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/pacman.d/partial.toml";

/// Default location of the keep list
pub const DEFAULT_KEEP_FILE: &str = "/etc/pacman.d/partial_keep";

/// Default location of the always list
pub const DEFAULT_ALWAYS_FILE: &str = "/etc/pacman.d/partial_always";

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// List of packages never to change without asking
    pub keep_file: PathBuf,

    /// List of packages to update whenever they are stale
    pub always_file: PathBuf,

    /// Built-in always-update packages, merged with `always_file`
    pub always: Vec<String>,

    pub pacman_bin: String,
    pub pactree_bin: String,

    /// Prefix of the temporary database `checkupdates` syncs into;
    /// the login name is appended
    pub checkupdates_db_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keep_file: PathBuf::from(DEFAULT_KEEP_FILE),
            always_file: PathBuf::from(DEFAULT_ALWAYS_FILE),
            always: vec!["archlinux-keyring".to_string()],
            pacman_bin: "pacman".to_string(),
            pactree_bin: "pactree".to_string(),
            checkupdates_db_prefix: "/tmp/checkup-db-".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist or cannot be read
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e))),
            Err(e) => {
                debug!("Settings file {} not read ({}), using defaults", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    /// Database directory used with `--checkupdates`
    pub fn checkupdates_db(&self, login: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.checkupdates_db_prefix, login))
    }

    /// Keep list contents; an unreadable file contributes nothing
    pub fn keep_list(&self) -> PackageSet {
        load_package_list(&self.keep_file, "Keep")
    }

    /// Configured always-update packages, built-in and from the list file
    pub fn always_list(&self) -> PackageSet {
        let mut always: PackageSet = self.always.iter().cloned().collect();
        always.extend(load_package_list(&self.always_file, "Always"));
        always
    }
}

/// Parse a list file: one package per line, `#` starts a comment
pub fn parse_package_list(content: &str) -> PackageSet {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a list file
pub fn read_package_list(path: &Path) -> std::io::Result<PackageSet> {
    std::fs::read_to_string(path).map(|content| parse_package_list(&content))
}

/// Read a list file, treating an unreadable file as empty
fn load_package_list(path: &Path, what: &str) -> PackageSet {
    match read_package_list(path) {
        Ok(list) => {
            debug!("{}-file {} lists {} packages", what, path.display(), list.len());
            list
        }
        Err(e) => {
            debug!("{}-file cannot be read ({}), continuing.", what, e);
            PackageSet::new()
        }
    }
}
