//! View synchronization (snapshot vs dynamic views)

use crate::cleartool::ClearCaseError;
use crate::cleartool::constants::{commands, flags, special};

use super::ClearCaseRepository;

/// What [`ClearCaseRepository::update`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Dynamic view: always current, nothing to do
    DynamicView,
    /// Snapshot view refreshed with `update -overwrite -f`
    SnapshotUpdated,
    /// Snapshot view update exited non-zero; the view may be partially loaded
    SnapshotIncomplete { exit_code: i32 },
    /// `catcs` failed, so the view type is unknown and nothing was updated
    ConfigSpecUnavailable { exit_code: i32 },
}

impl SyncOutcome {
    /// Did the view end up current?
    pub fn is_current(&self) -> bool {
        matches!(self, Self::DynamicView | Self::SnapshotUpdated)
    }
}

impl ClearCaseRepository {
    /// Bring the view up to date
    ///
    /// Snapshot views (config spec has `load` rules) are force-updated.
    /// Dynamic views need no refresh. The update is best-effort: a failing
    /// `update` is reported in the outcome, never rolled back or retried.
    pub fn update(&self) -> Result<SyncOutcome, ClearCaseError> {
        let mut catcs = self.cleartool.spawn([commands::CATCS], Some(self.root()))?;
        let mut snapshot = false;
        // Read everything even after a match so catcs never blocks on a full pipe.
        while let Some(line) = catcs.next_line()? {
            snapshot |= line.starts_with(special::SNAPSHOT_LOAD_KEYWORD);
        }
        let exit = catcs.finish()?;

        if exit.code != 0 {
            tracing::warn!(
                root = %self.root().display(),
                exit_code = exit.code,
                stderr = %exit.stderr.trim(),
                "cleartool catcs failed, not updating view"
            );
            return Ok(SyncOutcome::ConfigSpecUnavailable { exit_code: exit.code });
        }
        if !snapshot {
            tracing::debug!(root = %self.root().display(), "dynamic view, no update needed");
            return Ok(SyncOutcome::DynamicView);
        }

        let mut update = self.cleartool.spawn(
            [commands::UPDATE, flags::OVERWRITE, flags::FORCE],
            Some(self.root()),
        )?;
        update.drain()?;
        let exit = update.finish()?;

        if exit.code != 0 {
            tracing::warn!(
                root = %self.root().display(),
                exit_code = exit.code,
                stderr = %exit.stderr.trim(),
                "snapshot view update did not fully succeed"
            );
            return Ok(SyncOutcome::SnapshotIncomplete { exit_code: exit.code });
        }
        Ok(SyncOutcome::SnapshotUpdated)
    }
}
