//! ClearCase repository detection
//!
//! Decides whether a directory is the top of a ClearCase tree, checking in
//! order (first match wins):
//! 1. a `view.dat` next to the path (snapshot view root);
//! 2. a parent directory named `vobs` (VOB mount point);
//! 3. the canonical path is a VOB root listed by `cleartool lsvob -s`;
//! 4. a `.specdev` two levels up (web view).
//!
//! Filesystem errors never escape; a check that cannot be evaluated does not
//! match.

use std::path::Path;
use std::sync::Arc;

use crate::cleartool::constants::markers;
use crate::vob::VobRegistry;

/// Detector for ClearCase-managed directories
#[derive(Debug, Clone)]
pub struct RepositoryDetector {
    registry: Arc<VobRegistry>,
}

impl RepositoryDetector {
    pub fn new(registry: Arc<VobRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &VobRegistry {
        &self.registry
    }

    /// Check if `path` is the root of a ClearCase repository
    pub fn is_repository_for(&self, path: &Path) -> bool {
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());

        if let Some(parent) = parent {
            let view_dat = parent.join(markers::VIEW_DAT);
            if is_same_file(path, &view_dat) {
                return false;
            }
            if view_dat.exists() {
                return true;
            }
            if parent.is_dir() && is_vobs_dir(parent) {
                return true;
            }
        }

        if self.registry.cleartool().is_working() {
            match path.canonicalize() {
                Ok(canonical) if self.registry.contains(&canonical) => return true,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not canonicalize path");
                }
            }
        }

        parent
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .is_some_and(|grandparent| grandparent.join(markers::SPECDEV).exists())
    }
}

fn is_vobs_dir(dir: &Path) -> bool {
    dir.file_name()
        .is_some_and(|name| name.to_string_lossy().eq_ignore_ascii_case(markers::VOBS_DIR))
}

/// Do both paths name the same existing file? Errors count as "no".
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleartool::ClearTool;
    use crate::vob::VobSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn offline_detector() -> RepositoryDetector {
        let cleartool = ClearTool::new(Some(PathBuf::from("/nonexistent/cleartool")));
        RepositoryDetector::new(Arc::new(VobRegistry::new(cleartool)))
    }

    #[test]
    fn test_sibling_view_dat_matches() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("view.dat"), "").unwrap();
        fs::create_dir(dir.path().join("project")).unwrap();

        assert!(offline_detector().is_repository_for(&dir.path().join("project")));
    }

    #[test]
    fn test_view_dat_itself_does_not_match() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("view.dat"), "").unwrap();

        assert!(!offline_detector().is_repository_for(&dir.path().join("view.dat")));
    }

    #[test]
    fn test_parent_named_vobs_matches_case_insensitively() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("VOBS/core")).unwrap();

        assert!(offline_detector().is_repository_for(&dir.path().join("VOBS/core")));
    }

    #[test]
    fn test_specdev_in_grandparent_matches() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("view/element")).unwrap();
        fs::write(dir.path().join(".specdev"), "").unwrap();

        assert!(offline_detector().is_repository_for(&dir.path().join("view/element")));
    }

    #[test]
    fn test_plain_directory_does_not_match() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/lib")).unwrap();

        assert!(!offline_detector().is_repository_for(&dir.path().join("src/lib")));
    }

    #[test]
    fn test_registry_is_ignored_when_client_is_down() {
        let dir = TempDir::new().unwrap();
        let canonical = dir.path().canonicalize().unwrap();
        let cleartool = ClearTool::new(Some(PathBuf::from("/nonexistent/cleartool")));
        let registry = VobRegistry::with_vobs(
            cleartool,
            VobSet::from_lines([canonical.to_string_lossy().as_ref()]),
        );

        assert!(!RepositoryDetector::new(Arc::new(registry)).is_repository_for(dir.path()));
    }

    #[test]
    fn test_paths_without_parent_do_not_panic() {
        let detector = offline_detector();
        assert!(!detector.is_repository_for(Path::new("/")));
        assert!(!detector.is_repository_for(Path::new("relative")));
        assert!(!detector.is_repository_for(Path::new("")));
    }
}
