//! History data model

use chrono::NaiveDateTime;

use crate::cleartool::constants::special::VERSION_EVENTS;

/// One record of `cleartool lshistory` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Event description (e.g. "create version", "create branch")
    pub event: String,
    /// When the event happened (client local time)
    pub date: NaiveDateTime,
    /// User who caused the event
    pub author: String,
    /// Version path, `/`-separated (e.g. "/main/br/3")
    pub revision: String,
    /// Event comment; lines joined with `\n`, may be empty
    pub message: String,
}

impl HistoryEntry {
    /// Does this event create a new version of the element?
    pub fn is_version(&self) -> bool {
        VERSION_EVENTS.contains(&self.event.as_str())
    }

    /// First line of the comment
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// History of a file or directory, in the order cleartool listed it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    pub entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries that created versions (branch/label/lock events are skipped)
    pub fn versions(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(|e| e.is_version())
    }
}
