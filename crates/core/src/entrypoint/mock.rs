use super::{EntryPointError, EntryPointFinder};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Finder returning a canned path and recording every lookup.
pub struct MockEntryPointFinder {
    result: Option<PathBuf>,
    lookups: Mutex<Vec<PathBuf>>,
}

impl MockEntryPointFinder {
    pub fn returning(path: impl Into<PathBuf>) -> Self {
        Self {
            result: Some(path.into()),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Every lookup fails with `NotFound`.
    pub fn not_found() -> Self {
        Self {
            result: None,
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<PathBuf> {
        self.lookups.lock().unwrap().clone()
    }
}

impl EntryPointFinder for MockEntryPointFinder {
    fn find_management_entry_point(&self, root: &Path) -> Result<PathBuf, EntryPointError> {
        self.lookups.lock().unwrap().push(root.to_path_buf());
        self.result.clone().ok_or_else(|| EntryPointError::NotFound {
            file: super::MANAGE_PY,
            root: root.to_path_buf(),
        })
    }
}
