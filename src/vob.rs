//! VOB registry
//!
//! The set of VOB roots known to the local ClearCase installation, as listed
//! by `cleartool lsvob -s`. The listing runs at most once per registry; share
//! one registry (`Arc<VobRegistry>`) between detectors to share the result.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::cleartool::ClearTool;
use crate::cleartool::constants::{commands, flags};

/// Canonical VOB root paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VobSet {
    roots: BTreeSet<String>,
}

impl VobSet {
    /// Build a set from `lsvob -s` style lines; blank lines are ignored
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let roots = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { roots }
    }

    /// Case-insensitive membership test
    pub fn contains(&self, path: &str) -> bool {
        let wanted = path.to_lowercase();
        self.roots.iter().any(|root| root.to_lowercase() == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Lazily built, shared registry of VOB roots
#[derive(Debug)]
pub struct VobRegistry {
    cleartool: ClearTool,
    vobs: Mutex<Option<Arc<VobSet>>>,
}

impl VobRegistry {
    pub fn new(cleartool: ClearTool) -> Self {
        Self {
            cleartool,
            vobs: Mutex::new(None),
        }
    }

    /// Registry whose set is already known (no cleartool calls)
    pub fn with_vobs(cleartool: ClearTool, vobs: VobSet) -> Self {
        Self {
            cleartool,
            vobs: Mutex::new(Some(Arc::new(vobs))),
        }
    }

    /// The client used for enumeration and liveness checks
    pub fn cleartool(&self) -> &ClearTool {
        &self.cleartool
    }

    /// All VOB roots, enumerating them on first use
    ///
    /// Concurrent first callers block on the lock while one of them runs
    /// `lsvob`, so the enumeration happens once. The result, empty or not,
    /// stays cached until [`Self::refresh`].
    pub fn all_vobs(&self) -> Arc<VobSet> {
        let mut cached = self.vobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(vobs) = cached.as_ref() {
            return Arc::clone(vobs);
        }

        let vobs = Arc::new(self.enumerate());
        *cached = Some(Arc::clone(&vobs));
        vobs
    }

    /// Forget the cached set; the next lookup lists VOBs again
    pub fn refresh(&self) {
        *self.vobs.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Is `canonical` (case-insensitively) one of the VOB roots?
    pub fn contains(&self, canonical: &Path) -> bool {
        self.all_vobs().contains(&canonical.to_string_lossy())
    }

    fn enumerate(&self) -> VobSet {
        if !self.cleartool.is_working() {
            return VobSet::default();
        }

        match self.cleartool.run([commands::LSVOB, flags::SHORT], None) {
            Ok(outcome) if outcome.success() => {
                let vobs = VobSet::from_lines(outcome.stdout_str().lines());
                tracing::debug!(vobs = ?vobs.roots, "found VOBs");
                vobs
            }
            Ok(outcome) => {
                tracing::error!(
                    exit_code = outcome.exit_code,
                    stderr = %outcome.stderr.trim(),
                    "cleartool lsvob -s returned non-zero status"
                );
                VobSet::default()
            }
            Err(e) => {
                tracing::error!(error = %e, "cleartool lsvob -s failed");
                VobSet::default()
            }
        }
    }
}
