//! cleartool-specific constants
//!
//! Centralized definitions for cleartool command names, flags, and the
//! filesystem markers used to recognize ClearCase trees.

/// cleartool binary name, resolved through `PATH` when no override is given
pub const CLEARTOOL_COMMAND: &str = "cleartool";

/// Environment variable overriding the cleartool executable
pub const CLEARTOOL_ENV: &str = "CCVIEW_CLEARTOOL";

/// Environment variable enabling verbose history messages
pub const VERBOSE_ENV: &str = "CCVIEW_VERBOSE";

/// cleartool subcommands
pub mod commands {
    pub const LSHISTORY: &str = "lshistory";
    pub const GET: &str = "get";
    pub const ANNOTATE: &str = "annotate";
    pub const CATCS: &str = "catcs";
    pub const UPDATE: &str = "update";
    pub const LSVOB: &str = "lsvob";
}

/// cleartool command flags
pub mod flags {
    /// Show version (liveness probe)
    pub const VERSION: &str = "-version";
    /// List the directory element itself rather than its contents
    pub const DIRECTORY: &str = "-dir";
    /// Output format template
    pub const FORMAT: &str = "-fmt";
    /// Destination for `get`
    pub const TO: &str = "-to";
    /// Suppress the annotate header
    pub const NO_HEADER: &str = "-nheader";
    /// Output destination for annotate
    pub const OUT: &str = "-out";
    /// Write to standard output (argument of `-out`)
    pub const STDOUT: &str = "-";
    /// Force (annotate) / no prompt (update)
    pub const FORCE: &str = "-f";
    /// Overwrite hijacked files on update
    pub const OVERWRITE: &str = "-overwrite";
    /// Short listing (lsvob)
    pub const SHORT: &str = "-s";
}

/// Special cleartool values
pub mod special {
    /// Separator between an element path and its version (`file@@/main/3`)
    pub const EXTENDED_PATH_SEPARATOR: &str = "@@";

    /// Config spec rule keyword that only snapshot views carry
    pub const SNAPSHOT_LOAD_KEYWORD: &str = "load";

    /// Date format produced by the `%Nd` directive
    pub const NUMERIC_DATE_FORMAT: &str = "%Y%m%d.%H%M%S";

    /// History events that create a new version of an element
    pub const VERSION_EVENTS: [&str; 2] = ["create version", "create directory version"];
}

/// Filesystem markers consulted during repository detection
pub mod markers {
    /// View storage file found next to the top of a snapshot view
    pub const VIEW_DAT: &str = "view.dat";

    /// Conventional directory holding VOB mount points
    pub const VOBS_DIR: &str = "vobs";

    /// Marker found two levels above elements of a web view
    pub const SPECDEV: &str = ".specdev";
}

/// Prefix of temporary files holding fetched revisions
pub const TEMP_FILE_PREFIX: &str = "ccview";
