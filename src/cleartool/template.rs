//! cleartool format templates for stable output parsing
//!
//! These templates ensure consistent, parseable output from cleartool
//! regardless of the user's locale or default report formats.

/// Separator between fields of an annotate line
pub const FIELD_SEPARATOR: char = '|';

/// Line terminating one history record
pub const RECORD_TERMINATOR: &str = ".";

/// Templates for cleartool commands
pub struct Templates;

impl Templates {
    /// Template for `cleartool lshistory -fmt`
    ///
    /// One field per line, in this order:
    /// 1. event (`%e`, e.g. "create version")
    /// 2. date (`%Nd`, numeric `yyyymmdd.hhmmss`)
    /// 3. user (`%u`)
    /// 4. version path (`%Vn`, e.g. `/main/br/3`)
    /// 5. comment (`%Nc`, may span several lines)
    ///
    /// The record ends with a line holding a single `.`.
    pub fn lshistory() -> &'static str {
        concat!("%e\n", "%Nd\n", "%u\n", "%Vn\n", "%Nc\n", ".\n")
    }

    /// Template for `cleartool annotate -fmt`
    ///
    /// Fields (separated by `|`):
    /// 1. user (`%u`)
    /// 2. version path (`%Vn`)
    ///
    /// The trailing `|` separates the fields from the annotated line text.
    pub fn annotate() -> &'static str {
        "%u|%Vn|"
    }
}
