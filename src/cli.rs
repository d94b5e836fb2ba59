//! CLI command implementations for Kingdom.

// Commands take their clap arguments by value
#![allow(clippy::needless_pass_by_value)]

pub(crate) mod battle;
pub(crate) mod plan;
pub(crate) mod theory;
pub(crate) mod tiles;
pub(crate) mod upgrades;
pub(crate) mod validate;
pub(crate) mod watch;

mod output;

use clap::ValueEnum;
use kingdom::{KingdomSnapshot, Rejection, Rules, SelectionError, SnapshotError};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Output format for inspection commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SnapshotError> for CliError {
    fn from(e: SnapshotError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SelectionError> for CliError {
    fn from(e: SelectionError) -> Self {
        Self::new(format!("invalid tile: {e}"))
    }
}

impl From<Rejection> for CliError {
    fn from(e: Rejection) -> Self {
        Self::new(format!("rejected: {e}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Settings shared by every command.
#[derive(Debug)]
pub(crate) struct Context {
    /// Contract rules in effect.
    pub(crate) rules: Rules,
    /// Fixed clock, if overridden on the command line.
    now: Option<u64>,
}

impl Context {
    /// Build the context from global options.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules file cannot be loaded.
    pub(crate) fn new(rules: Option<PathBuf>, now: Option<u64>) -> Result<Self, CliError> {
        let rules = match rules {
            Some(path) => Rules::load(&path).map_err(|e| {
                CliError::new(format!("Failed to load rules {}: {e}", path.display()))
            })?,
            None => Rules::default(),
        };
        Ok(Self { rules, now })
    }

    /// Current unix time, or the override.
    pub(crate) fn now(&self) -> u64 {
        self.now.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs())
        })
    }
}

/// Load a snapshot file, naming the file in errors.
pub(crate) fn load_snapshot(path: &Path) -> Result<KingdomSnapshot, CliError> {
    KingdomSnapshot::load(path)
        .map_err(|e| CliError::new(format!("Failed to load {}: {e}", path.display())))
}

/// Print a value as pretty JSON.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
