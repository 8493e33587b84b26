//! ClearCase repository handle
//!
//! History, annotation and historical content for one view directory.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use scopeguard::ScopeGuard;

use crate::cleartool::constants::{commands, flags, special};
use crate::cleartool::parser::Parser;
use crate::cleartool::template::Templates;
use crate::cleartool::{ClearCaseError, ClearTool, ProcessOutcome};
use crate::config::Config;
use crate::model::{Annotation, History};
use crate::revision::{self, RevisionBlob};

/// Access to a ClearCase view rooted at one directory
#[derive(Debug)]
pub struct ClearCaseRepository {
    /// Canonical repository root
    root: PathBuf,
    pub(super) cleartool: ClearTool,
    verbose: bool,
    date_patterns: Vec<String>,
}

impl ClearCaseRepository {
    /// Open a repository handle for an existing directory
    pub fn open(root: impl AsRef<Path>, config: &Config) -> Result<Self, ClearCaseError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ClearCaseError::NotADirectory(root.to_path_buf()));
        }

        Ok(Self {
            root: root.canonicalize()?,
            cleartool: ClearTool::new(config.command.clone()),
            verbose: config.verbose,
            date_patterns: config.date_patterns.clone(),
        })
    }

    /// Canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cleartool(&self) -> &ClearTool {
        &self.cleartool
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn date_patterns(&self) -> &[String] {
        &self.date_patterns
    }

    /// Path of `path` relative to the repository root, as cleartool expects it
    ///
    /// The root itself maps to `.`. `path` need not exist: elements removed
    /// from the view still have history and older versions.
    pub fn relative_path(&self, path: &Path) -> Result<String, ClearCaseError> {
        let canonical = resolve_path(path)?;
        let relative = canonical.strip_prefix(&self.root).map_err(|_| {
            ClearCaseError::OutsideRepository {
                path: canonical.clone(),
                root: self.root.clone(),
            }
        })?;

        if relative.as_os_str().is_empty() {
            Ok(".".to_string())
        } else {
            Ok(relative.to_string_lossy().into_owned())
        }
    }

    /// Get the history of a file or directory
    ///
    /// Entries are returned in the order cleartool lists them. A failing
    /// command or unparseable output is returned as an error.
    pub fn history(&self, path: &Path) -> Result<History, ClearCaseError> {
        let relative = self.relative_path(path)?;
        let args = Self::history_args(&relative, path.is_dir());
        self.log_command(commands::LSHISTORY, &relative);

        let outcome = self.cleartool.run(&args, Some(self.root.as_path()))?;
        let outcome = Self::require_success(commands::LSHISTORY, outcome)?;
        Parser::parse_history(&outcome.stdout_str(), &self.date_patterns)
    }

    /// Fetch the content of `path` at `revision` (a version path like `/main/3`)
    ///
    /// Returns `Ok(None)` when cleartool cannot produce that version.
    pub fn get_revision(
        &self,
        path: &Path,
        revision: &str,
    ) -> Result<Option<RevisionBlob>, ClearCaseError> {
        let relative = self.relative_path(path)?;
        let extended = format!("{}{}{}", relative, special::EXTENDED_PATH_SEPARATOR, revision);
        self.log_command(commands::GET, &extended);

        let temp = scopeguard::guard(revision::reserve_temp_path()?, |temp| {
            let _ = revision::remove_temp(temp);
        });

        let mut running = self
            .cleartool
            .spawn(Self::get_args(&temp, &extended), Some(self.root.as_path()))?;
        // Must reach EOF before waiting; see RunningCommand::drain.
        running.drain()?;
        let exit = running.finish()?;

        if exit.code != 0 {
            tracing::warn!(
                version = %extended,
                exit_code = exit.code,
                stderr = %exit.stderr.trim(),
                "cleartool get failed"
            );
            return Ok(None);
        }

        let blob = RevisionBlob::open(ScopeGuard::into_inner(temp))?;
        Ok(Some(blob))
    }

    /// Annotate `file`, optionally at a specific revision
    ///
    /// The result holds exactly one line per annotated source line. Checking
    /// that against the file's own line count is left to the caller.
    pub fn annotate(
        &self,
        file: &Path,
        revision: Option<&str>,
    ) -> Result<Annotation, ClearCaseError> {
        let name = file.file_name().ok_or_else(|| {
            ClearCaseError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot annotate {}: no file name", file.display()),
            ))
        })?;
        let parent = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        self.log_command(commands::ANNOTATE, &file.to_string_lossy());

        let mut running = self
            .cleartool
            .spawn(Self::annotate_args(revision, name), Some(parent))?;

        let mut annotation = Annotation::new(name.to_string_lossy().into_owned());
        let mut line_number = 0;
        while let Some(line) = running.next_line()? {
            line_number += 1;
            Parser::push_annotate_line(&mut annotation, line_number, &line)?;
        }

        let exit = running.finish()?;
        if exit.code != 0 {
            return Err(ClearCaseError::CommandFailed {
                command: commands::ANNOTATE.to_string(),
                exit_code: exit.code,
                stderr: exit.stderr,
            });
        }
        Ok(annotation)
    }

    /// `lshistory [-dir] -fmt <template> <relative>`
    pub(crate) fn history_args(relative: &str, is_dir: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![commands::LSHISTORY.into()];
        if is_dir {
            args.push(flags::DIRECTORY.into());
        }
        args.push(flags::FORMAT.into());
        args.push(Templates::lshistory().into());
        args.push(relative.into());
        args
    }

    /// `get -to <target> <relative>@@<revision>`
    pub(crate) fn get_args(target: &Path, extended: &str) -> Vec<OsString> {
        vec![
            commands::GET.into(),
            flags::TO.into(),
            target.as_os_str().to_os_string(),
            extended.into(),
        ]
    }

    /// `annotate -nheader -out - -f -fmt <template> [<revision>] <name>`
    pub(crate) fn annotate_args(revision: Option<&str>, name: &std::ffi::OsStr) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            commands::ANNOTATE,
            flags::NO_HEADER,
            flags::OUT,
            flags::STDOUT,
            flags::FORCE,
            flags::FORMAT,
            Templates::annotate(),
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        if let Some(rev) = revision {
            args.push(rev.into());
        }
        args.push(name.to_os_string());
        args
    }

    fn require_success(command: &str, outcome: ProcessOutcome) -> Result<ProcessOutcome, ClearCaseError> {
        if outcome.success() {
            Ok(outcome)
        } else {
            Err(ClearCaseError::CommandFailed {
                command: command.to_string(),
                exit_code: outcome.exit_code,
                stderr: outcome.stderr,
            })
        }
    }

    fn log_command(&self, command: &str, target: &str) {
        if self.verbose {
            tracing::info!(root = %self.root.display(), command, target, "running cleartool");
        } else {
            tracing::debug!(root = %self.root.display(), command, target, "running cleartool");
        }
    }
}

/// Canonicalize the deepest existing ancestor of `path` and re-append the rest
fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();

    let mut resolved = loop {
        match existing.canonicalize() {
            Ok(base) => break base,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
                    return Err(e);
                };
                missing.push(name);
                existing = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            Err(e) => return Err(e),
        }
    };

    for name in missing.into_iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}
