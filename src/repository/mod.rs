//! Repository abstraction
//!
//! [`Repository`] is the capability set an indexer needs from a version
//! control system. [`Dispatcher`] picks the [`RepositoryKind`] that owns a
//! directory and opens a handle for it.

mod clearcase;
mod detect;
mod view;

pub use clearcase::ClearCaseRepository;
pub use detect::RepositoryDetector;
pub use view::SyncOutcome;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::cleartool::ClearCaseError;
use crate::config::Config;
use crate::model::{Annotation, History};
use crate::revision::RevisionBlob;
use crate::vob::VobRegistry;

/// Supported repository kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryKind {
    ClearCase,
}

impl RepositoryKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClearCase => "ClearCase",
        }
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only access to a version-controlled tree
pub trait Repository: fmt::Debug + Send + Sync {
    fn kind(&self) -> RepositoryKind;

    /// Root directory of the tree
    fn root(&self) -> &Path;

    /// Is the client tool usable?
    fn is_working(&self) -> bool;

    /// Whether directories have their own history
    fn has_history_for_directories(&self) -> bool;

    /// Whether `file` has a history worth listing
    fn file_has_history(&self, file: &Path) -> bool;

    /// Whether `file` can be annotated
    fn file_has_annotation(&self, file: &Path) -> bool;

    fn history(&self, path: &Path) -> Result<History, ClearCaseError>;

    fn annotate(&self, file: &Path, revision: Option<&str>) -> Result<Annotation, ClearCaseError>;

    fn get_revision(
        &self,
        path: &Path,
        revision: &str,
    ) -> Result<Option<RevisionBlob>, ClearCaseError>;

    /// Synchronize the local working tree
    fn update(&self) -> Result<SyncOutcome, ClearCaseError>;
}

impl Repository for ClearCaseRepository {
    fn kind(&self) -> RepositoryKind {
        RepositoryKind::ClearCase
    }

    fn root(&self) -> &Path {
        ClearCaseRepository::root(self)
    }

    fn is_working(&self) -> bool {
        self.cleartool.is_working()
    }

    fn has_history_for_directories(&self) -> bool {
        true
    }

    // Every element in a ClearCase view is versioned.
    fn file_has_history(&self, _file: &Path) -> bool {
        true
    }

    fn file_has_annotation(&self, _file: &Path) -> bool {
        true
    }

    fn history(&self, path: &Path) -> Result<History, ClearCaseError> {
        ClearCaseRepository::history(self, path)
    }

    fn annotate(&self, file: &Path, revision: Option<&str>) -> Result<Annotation, ClearCaseError> {
        ClearCaseRepository::annotate(self, file, revision)
    }

    fn get_revision(
        &self,
        path: &Path,
        revision: &str,
    ) -> Result<Option<RevisionBlob>, ClearCaseError> {
        ClearCaseRepository::get_revision(self, path, revision)
    }

    fn update(&self) -> Result<SyncOutcome, ClearCaseError> {
        ClearCaseRepository::update(self)
    }
}

/// Maps directories to the repository kind that manages them
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: Config,
    clearcase: RepositoryDetector,
}

impl Dispatcher {
    pub fn new(config: Config, registry: Arc<VobRegistry>) -> Self {
        Self {
            config,
            clearcase: RepositoryDetector::new(registry),
        }
    }

    /// Which kind of repository, if any, is rooted at `path`
    pub fn detect(&self, path: &Path) -> Option<RepositoryKind> {
        if self.clearcase.is_repository_for(path) {
            return Some(RepositoryKind::ClearCase);
        }
        None
    }

    /// Open a handle for the repository rooted at `path`, if there is one
    pub fn open(&self, path: &Path) -> Result<Option<Box<dyn Repository>>, ClearCaseError> {
        match self.detect(path) {
            Some(RepositoryKind::ClearCase) => {
                let repo = ClearCaseRepository::open(path, &self.config)?;
                Ok(Some(Box::new(repo)))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleartool::ClearTool;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn dispatcher() -> Dispatcher {
        let config = Config::default().with_command("/nonexistent/cleartool");
        let registry = VobRegistry::new(ClearTool::new(config.command.clone()));
        Dispatcher::new(config, Arc::new(registry))
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(RepositoryKind::ClearCase.to_string(), "ClearCase");
    }

    #[test]
    fn test_open_detected_repository() {
        let dir = TempDir::new().unwrap();
        let vob = dir.path().join("vobs").join("core");
        std::fs::create_dir_all(&vob).unwrap();

        let dispatcher = dispatcher();
        assert_eq!(dispatcher.detect(&vob), Some(RepositoryKind::ClearCase));

        let repo = dispatcher.open(&vob).unwrap().expect("repository");
        assert_eq!(repo.kind(), RepositoryKind::ClearCase);
        assert_eq!(repo.root(), vob.canonicalize().unwrap().as_path());
        assert!(repo.has_history_for_directories());
        assert!(repo.file_has_history(&vob.join("main.c")));
        assert!(repo.file_has_annotation(&vob.join("main.c")));
        assert!(!repo.is_working());
    }

    #[test]
    fn test_open_unmanaged_directory() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("plain");
        std::fs::create_dir(&plain).unwrap();

        assert!(dispatcher().open(&plain).unwrap().is_none());
        assert!(dispatcher().detect(&PathBuf::from("/")).is_none());
    }
}
