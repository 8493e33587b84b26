//! cleartool output parser
//!
//! Parses the output from cleartool commands into structured data.

mod annotation;
mod history;


use regex::Regex;
use std::sync::LazyLock;

use super::ClearCaseError;

/// Regex for the release line of `cleartool -version`
///
/// Examples:
/// - `ClearCase version 9.0.2.4 (Wed Dec 05 15:01:03 EST 2018) (9.0.2.04.00_2018D.FCS)`
/// - `ClearCase LT version 7.1.2 (Fri Mar 19 2010)`
/// - `cleartool                         9.0.2.4 (Tue Nov 13 2018)`
///
/// Group 1 is the dotted release number.
static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:ClearCase(?: LT)? version|cleartool)\s+(\d+(?:\.\d+)+)")
        .expect("Invalid version regex")
});

/// Parser for cleartool command output
pub struct Parser;

impl Parser {
    /// Extract the release number from `cleartool -version` output
    pub fn parse_version(output: &str) -> Result<String, ClearCaseError> {
        VERSION_REGEX
            .captures(output)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                ClearCaseError::Parse(format!(
                    "no release number in version output: {:?}",
                    output.lines().next().unwrap_or("")
                ))
            })
    }

    /// Normalize a version path so Windows and POSIX clients compare equal
    pub fn normalize_revision(revision: &str) -> String {
        revision.replace('\\', "/")
    }
}
