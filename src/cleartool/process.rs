//! Child process lifecycle
//!
//! Every cleartool invocation goes through [`RunningCommand`]. Stdout is read
//! to end-of-stream before the exit status is collected, stderr is drained on
//! a helper thread, and a guard reaps or kills the child on every exit path.

use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use scopeguard::ScopeGuard;

use super::ClearCaseError;

/// Exit information of a finished command
#[derive(Debug, Clone)]
pub(crate) struct Exit {
    /// Exit code (-1 when terminated by a signal)
    pub code: i32,
    /// Everything the command wrote to stderr
    pub stderr: String,
}

/// A spawned cleartool process whose output has not been fully consumed yet
pub(crate) struct RunningCommand {
    child: ScopeGuard<Child, fn(Child)>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr: Option<JoinHandle<String>>,
}

impl RunningCommand {
    /// Spawn `cmd` with piped stdout/stderr and a closed stdin
    pub(crate) fn spawn(mut cmd: Command) -> Result<Self, ClearCaseError> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let program = PathBuf::from(cmd.get_program());
        tracing::debug!(command = ?cmd, "spawning cleartool");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ClearCaseError::ClientNotFound(program)
            } else {
                ClearCaseError::Io(e)
            }
        })?;

        let stdout = child.stdout.take().map(BufReader::new);
        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        Ok(Self {
            child: scopeguard::guard(child, reap as fn(Child)),
            stdout,
            stderr,
        })
    }

    /// Read the next stdout line without its line terminator
    ///
    /// Returns `Ok(None)` at end-of-stream. Invalid UTF-8 is replaced.
    pub(crate) fn next_line(&mut self) -> io::Result<Option<String>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut buf = Vec::new();
        if stdout.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Read all remaining stdout
    pub(crate) fn read_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(stdout) = self.stdout.as_mut() {
            stdout.read_to_end(&mut buf)?;
        }
        Ok(buf)
    }

    /// Read and discard all remaining stdout
    ///
    /// Some cleartool builds block writing their target file until the
    /// stdout pipe is consumed, so this must finish before [`Self::finish`]
    /// waits on the child.
    pub(crate) fn drain(&mut self) -> io::Result<u64> {
        match self.stdout.as_mut() {
            Some(stdout) => io::copy(stdout, &mut io::sink()),
            None => Ok(0),
        }
    }

    /// Drain what is left of stdout, wait for the child and collect stderr
    pub(crate) fn finish(mut self) -> Result<Exit, ClearCaseError> {
        self.drain()?;
        self.stdout = None;

        let status = wait_for(&mut self.child)?;
        let stderr = self
            .stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        Ok(Exit {
            code: status.code().unwrap_or(-1),
            stderr,
        })
    }
}

/// Block until the child exits, retrying interrupted waits
///
/// There is no timeout: a hung client blocks the caller. A deadline would
/// go into this loop.
fn wait_for(child: &mut Child) -> io::Result<ExitStatus> {
    loop {
        match child.wait() {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

/// Make sure a child never outlives its command, even on error paths
fn reap(mut child: Child) {
    match child.try_wait() {
        Ok(Some(_)) => {}
        Ok(None) => {
            tracing::warn!(pid = child.id(), "cleartool still running, killing it");
            let _ = child.kill();
            let _ = wait_for(&mut child);
        }
        Err(e) => tracing::warn!(pid = child.id(), error = %e, "failed to probe cleartool"),
    }
}
