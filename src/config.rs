//! Repository configuration
//!
//! Settings shared by every ClearCase repository handle. Values come from
//! explicit builder calls or from the environment.

use std::env;
use std::path::PathBuf;

use crate::cleartool::constants::{CLEARTOOL_ENV, VERBOSE_ENV, special};

/// Configuration for ClearCase repository handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// cleartool executable override (None = `cleartool` from `PATH`)
    pub command: Option<PathBuf>,
    /// Log every cleartool invocation at info level
    pub verbose: bool,
    /// chrono formats accepted for history dates, tried in order
    pub date_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: None,
            verbose: false,
            date_patterns: vec![special::NUMERIC_DATE_FORMAT.to_string()],
        }
    }
}

impl Config {
    /// Build a configuration from `CCVIEW_CLEARTOOL` and `CCVIEW_VERBOSE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let command = lookup(CLEARTOOL_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let verbose = lookup(VERBOSE_ENV)
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            command,
            verbose,
            ..Self::default()
        }
    }

    pub fn with_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_date_patterns(mut self, patterns: Vec<String>) -> Self {
        self.date_patterns = patterns;
        self
    }
}
