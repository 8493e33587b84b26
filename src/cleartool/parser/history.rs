//! History parser (cleartool lshistory)

use chrono::NaiveDateTime;

use super::super::ClearCaseError;
use super::super::template::RECORD_TERMINATOR;
use super::Parser;
use crate::model::{History, HistoryEntry};

impl Parser {
    /// Parse `cleartool lshistory -fmt` output into a History
    ///
    /// Record layout (see `Templates::lshistory`):
    /// ```text
    /// create version
    /// 20170315.142301
    /// jdoe
    /// /main/3
    /// first comment line
    /// second comment line
    /// .
    /// ```
    ///
    /// Blank comment lines are dropped and the rest are trimmed. Entries keep
    /// the order cleartool emitted them in.
    pub fn parse_history(output: &str, date_patterns: &[String]) -> Result<History, ClearCaseError> {
        let mut entries = Vec::new();
        let mut lines = output.lines();

        while let Some(event) = lines.next() {
            let event = event.trim();
            if event.is_empty() {
                continue;
            }

            let mut field = |name: &str| {
                lines.next().map(str::trim).ok_or_else(|| {
                    ClearCaseError::Parse(format!("history record {:?} ends before its {}", event, name))
                })
            };
            let date = Self::parse_history_date(field("date")?, date_patterns)?;
            let author = field("user")?.to_string();
            let revision = Self::normalize_revision(field("version")?);

            let mut comment = Vec::new();
            for line in lines.by_ref() {
                if line.trim_end() == RECORD_TERMINATOR {
                    break;
                }
                let line = line.trim();
                if !line.is_empty() {
                    comment.push(line);
                }
            }

            entries.push(HistoryEntry {
                event: event.to_string(),
                date,
                author,
                revision,
                message: comment.join("\n"),
            });
        }

        Ok(History::new(entries))
    }

    /// Parse a history date against each accepted pattern in turn
    pub(super) fn parse_history_date(
        date: &str,
        date_patterns: &[String],
    ) -> Result<NaiveDateTime, ClearCaseError> {
        date_patterns
            .iter()
            .find_map(|pattern| NaiveDateTime::parse_from_str(date, pattern).ok())
            .ok_or_else(|| {
                ClearCaseError::Parse(format!(
                    "date {:?} matches none of {:?}",
                    date, date_patterns
                ))
            })
    }
}
