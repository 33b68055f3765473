// src/error.rs

//! Error types for pacpartial
//!
//! Query failures are kept separate from crate-level errors because most of
//! them are expected outcomes of a single package's lookup rather than
//! reasons to stop the whole run.

use std::process::ExitStatus;
use thiserror::Error;

/// Result type for pacpartial operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of one relationship query against the package index
#[derive(Error, Debug)]
pub enum QueryError {
    /// The forward index does not know this package
    #[error("cannot find {0}")]
    UnknownPackage(String),

    /// The package has no reverse dependency tree, usually because it is
    /// not installed
    #[error("{0} has no reverse dependencies")]
    NoReverseDependents(String),

    /// The query tool could not be started at all
    #[error("failed to run {tool}: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The query tool ran but failed in a way that says nothing about the
    /// package itself
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },
}

impl QueryError {
    /// Whether this failure is an ordinary answer about one package
    /// rather than a broken environment
    pub fn is_package_local(&self) -> bool {
        matches!(
            self,
            QueryError::UnknownPackage(_) | QueryError::NoReverseDependents(_)
        )
    }
}

/// Errors that stop a pacpartial run
#[derive(Error, Debug)]
pub enum Error {
    /// Relationship or snapshot query failed
    #[error(transparent)]
    Query(#[from] QueryError),

    /// IO error while reading input or talking to the operator
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An external command ran and reported failure
    #[error("{command} failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },
}
