//! cleartool command executor
//!
//! Handles locating cleartool, running its commands and capturing output.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use super::ClearCaseError;
use super::constants::{self, flags};
use super::parser::Parser;
use super::process::RunningCommand;

/// Resolves the cleartool executable once per repository handle
///
/// An explicit override wins; otherwise the bare command name is used and
/// the OS resolves it through `PATH` when the process is spawned.
#[derive(Debug, Default)]
pub struct CommandResolver {
    configured: Option<PathBuf>,
    resolved: OnceLock<PathBuf>,
}

impl CommandResolver {
    /// Create a resolver with an optional override
    pub fn new(configured: Option<PathBuf>) -> Self {
        Self {
            configured,
            resolved: OnceLock::new(),
        }
    }

    /// The executable to spawn
    pub fn resolve(&self) -> &Path {
        self.resolved.get_or_init(|| {
            self.configured
                .clone()
                .filter(|path| !path.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from(constants::CLEARTOOL_COMMAND))
        })
    }
}

/// Result of a command whose stdout was read to completion
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Exit code (-1 when terminated by a signal)
    pub exit_code: i32,
    /// Captured stdout
    pub stdout: Vec<u8>,
    /// Captured stderr
    pub stderr: String,
}

impl ProcessOutcome {
    /// Check if the command exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout as text (invalid UTF-8 is replaced)
    pub fn stdout_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }
}

/// Executor for cleartool commands
#[derive(Debug, Default)]
pub struct ClearTool {
    resolver: CommandResolver,
    /// Memoized result of the `-version` probe
    working: OnceLock<bool>,
}

impl ClearTool {
    /// Create an executor, optionally overriding the cleartool path
    pub fn new(command: Option<PathBuf>) -> Self {
        Self {
            resolver: CommandResolver::new(command),
            working: OnceLock::new(),
        }
    }

    /// Path of the executable that will be spawned
    pub fn command(&self) -> &Path {
        self.resolver.resolve()
    }

    /// Build a `Command` for cleartool with the given arguments
    pub(crate) fn command_for<I, S>(&self, args: I, cwd: Option<&Path>) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::new(self.command());
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Spawn cleartool for streaming consumption of its stdout
    pub(crate) fn spawn<I, S>(&self, args: I, cwd: Option<&Path>) -> Result<RunningCommand, ClearCaseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        RunningCommand::spawn(self.command_for(args, cwd))
    }

    /// Run a cleartool command to completion, capturing all of its output
    ///
    /// A non-zero exit is not an error here; callers decide what it means.
    pub fn run<I, S>(&self, args: I, cwd: Option<&Path>) -> Result<ProcessOutcome, ClearCaseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut running = self.spawn(args, cwd)?;
        let stdout = running.read_to_end()?;
        let exit = running.finish()?;

        Ok(ProcessOutcome {
            exit_code: exit.code,
            stdout,
            stderr: exit.stderr,
        })
    }

    /// Check whether cleartool answers `-version` successfully
    ///
    /// The probe runs once per executor; later calls return the cached answer.
    pub fn is_working(&self) -> bool {
        *self.working.get_or_init(|| {
            match self.run([flags::VERSION], None) {
                Ok(outcome) if outcome.success() => true,
                Ok(outcome) => {
                    tracing::warn!(
                        command = %self.command().display(),
                        exit_code = outcome.exit_code,
                        "cleartool -version failed"
                    );
                    false
                }
                Err(e) => {
                    tracing::warn!(command = %self.command().display(), error = %e, "cleartool is not usable");
                    false
                }
            }
        })
    }

    /// Get the ClearCase release reported by `cleartool -version`
    pub fn version(&self) -> Result<String, ClearCaseError> {
        let outcome = self.run([flags::VERSION], None)?;
        if !outcome.success() {
            return Err(ClearCaseError::CommandFailed {
                command: flags::VERSION.to_string(),
                exit_code: outcome.exit_code,
                stderr: outcome.stderr,
            });
        }
        Parser::parse_version(&outcome.stdout_str())
    }
}
