// src/selection/prompt.rs

//! Operator prompt for kept packages that a run would change

use crate::error::Result;
use crate::packages::PackageSet;
use std::io::{self, BufRead, Write};

/// Operator's answer to a keep conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    /// Change the kept packages anyway
    Proceed,
    /// Leave the kept packages out of the install
    Keep,
    /// Do nothing
    Abort,
}

impl ConflictDecision {
    /// Interpret a typed answer; anything unrecognised aborts
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim() {
            "y" | "Y" | "yes" | "YES" => ConflictDecision::Proceed,
            "keep" => ConflictDecision::Keep,
            _ => ConflictDecision::Abort,
        }
    }
}

/// Something that can settle keep conflicts
pub trait ConflictPrompt {
    fn ask(&mut self, conflicts: &PackageSet) -> Result<ConflictDecision>;
}

/// Line-based prompt on a terminal (or any reader/writer pair)
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ConflictPrompt for TerminalPrompt<R, W> {
    fn ask(&mut self, conflicts: &PackageSet) -> Result<ConflictDecision> {
        writeln!(
            self.output,
            "The following kept packages must be updated to complete this operation:"
        )?;
        for name in conflicts {
            writeln!(self.output, "{}", name)?;
        }
        writeln!(
            self.output,
            "NOTE: keeping could mean these packages or those that depend on them break."
        )?;
        write!(self.output, "Continue? [yes/no/keep] ")?;
        self.output.flush()?;

        // EOF reads as an empty answer, which aborts
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;

        Ok(ConflictDecision::from_answer(&answer))
    }
}
