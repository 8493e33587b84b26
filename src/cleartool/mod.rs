//! cleartool command execution layer
//!
//! This module handles executing cleartool commands and parsing their output.

pub mod constants;
mod executor;
/// Parser module (public for integration testing)
pub mod parser;
mod process;
pub mod template;

pub use executor::{ClearTool, CommandResolver, ProcessOutcome};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to ClearCase
#[derive(Error, Debug)]
pub enum ClearCaseError {
    #[error("cleartool is not installed or not in PATH ({0})")]
    ClientNotFound(PathBuf),

    #[error("cleartool {command} failed (exit code {exit_code}): {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Failed to parse cleartool output: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("{} is outside of repository {}", path.display(), root.display())]
    OutsideRepository { path: PathBuf, root: PathBuf },
}
