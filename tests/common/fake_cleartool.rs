//! FakeClearTool helper for integration tests.
//!
//! Writes a small shell script that answers the cleartool subcommands ccview
//! uses. Canned output and exit codes are read from files next to the script
//! (`<subcommand>.out`, `<subcommand>.rc`), and every invocation is appended
//! to `calls.log` as `<cwd> [arg] [arg] ...` (newlines inside arguments are
//! logged as `~`).

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use ccview::Config;

const SCRIPT: &str = r#"#!/bin/sh
dir='@DIR@'
{
    printf '%s' "$(pwd -P)"
    for a in "$@"; do printf ' [%s]' "$(printf '%s' "$a" | tr '\n' '~')"; done
    echo
} >> "$dir/calls.log"

rc() {
    if [ -f "$dir/$1.rc" ]; then exit "$(cat "$dir/$1.rc")"; fi
    exit 0
}
out() {
    if [ -f "$dir/$1.out" ]; then cat "$dir/$1.out"; fi
}

case "$1" in
    -version)
        if [ -f "$dir/down" ]; then exit 1; fi
        echo "ClearCase version 9.0.2.4 (Wed Dec 05 15:01:03 EST 2018)"
        exit 0 ;;
    lsvob)
        sleep 1
        out lsvob; rc lsvob ;;
    lshistory)
        out lshistory; rc lshistory ;;
    get)
        if [ "$2" != "-to" ] || [ -e "$3" ]; then
            echo "cleartool: Error: target exists" >&2
            exit 3
        fi
        # More than a pipe buffer of progress noise on stdout.
        head -c 262144 /dev/zero | tr '\0' '.'
        echo
        if [ -f "$dir/get.rc" ]; then rc get; fi
        cp "$dir/get.out" "$3"
        exit 0 ;;
    annotate)
        out annotate; rc annotate ;;
    catcs)
        out catcs; rc catcs ;;
    update)
        echo "Processing dir \".\"."
        rc update ;;
    noop)
        exit 0 ;;
    *)
        echo "cleartool: Error: Unrecognized command: \"$1\"" >&2
        exit 1 ;;
esac
"#;

/// A scripted cleartool living in a temporary directory.
pub struct FakeClearTool {
    dir: TempDir,
}

impl FakeClearTool {
    /// Create the script; it answers every subcommand with empty output.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let script = dir.path().join("cleartool");
        let body = SCRIPT.replace("@DIR@", &dir.path().display().to_string());
        fs::write(&script, body).expect("Failed to write fake cleartool");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake cleartool executable");

        let fake = Self { dir };
        fake.wait_until_executable();
        fake
    }

    /// Another test thread may still hold the script's write handle through
    /// a fork; retry until exec stops failing with "text file busy".
    fn wait_until_executable(&self) {
        for _ in 0..50 {
            match Command::new(self.command()).arg("noop").status() {
                Ok(_) => break,
                Err(e) if e.raw_os_error() == Some(26) => {
                    std::thread::sleep(std::time::Duration::from_millis(20));
                }
                Err(e) => panic!("Failed to run fake cleartool: {}", e),
            }
        }
        let _ = fs::remove_file(self.dir.path().join("calls.log"));
    }

    /// Path of the script, usable as the cleartool override.
    pub fn command(&self) -> PathBuf {
        self.dir.path().join("cleartool")
    }

    /// A config pointing at this script.
    pub fn config(&self) -> Config {
        Config::default().with_command(self.command())
    }

    /// Set the stdout of a subcommand.
    pub fn set_output(&self, subcommand: &str, output: &str) -> &Self {
        fs::write(self.dir.path().join(format!("{subcommand}.out")), output)
            .expect("Failed to write canned output");
        self
    }

    /// Set the exit code of a subcommand.
    pub fn set_exit_code(&self, subcommand: &str, code: i32) -> &Self {
        fs::write(self.dir.path().join(format!("{subcommand}.rc")), code.to_string())
            .expect("Failed to write canned exit code");
        self
    }

    /// Make `-version` fail, as an unusable installation would.
    pub fn set_down(&self) -> &Self {
        fs::write(self.dir.path().join("down"), "").expect("Failed to write down marker");
        self
    }

    /// Every logged invocation, oldest first.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Logged invocations of one subcommand.
    pub fn calls_of(&self, subcommand: &str) -> Vec<String> {
        let needle = format!(" [{subcommand}]");
        self.calls()
            .into_iter()
            .filter(|call| {
                call.find(" [")
                    .is_some_and(|start| call[start..].starts_with(&needle))
            })
            .collect()
    }

    /// Working directory of a logged invocation.
    pub fn cwd_of(call: &str) -> &Path {
        Path::new(call.split(" [").next().unwrap_or(""))
    }
}

impl Default for FakeClearTool {
    fn default() -> Self {
        Self::new()
    }
}
