use super::{EntryPointError, EntryPointFinder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANAGE_PY: &str = "manage.py";

/// Finds the shallowest `manage.py`, ignoring hidden directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManagePyFinder;

impl ManagePyFinder {
    pub fn new() -> Self {
        Self
    }
}

impl EntryPointFinder for ManagePyFinder {
    fn find_management_entry_point(&self, root: &Path) -> Result<PathBuf, EntryPointError> {
        let mut found: Vec<(usize, PathBuf)> = Vec::new();

        for result in WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(true)
            .follow_links(false)
            .build()
        {
            let entry = result.map_err(|source| EntryPointError::Walk {
                root: root.to_path_buf(),
                source,
            })?;

            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file && entry.file_name() == MANAGE_PY {
                found.push((entry.depth(), entry.into_path()));
            }
        }

        let Some(shallowest) = found.iter().map(|(depth, _)| *depth).min() else {
            return Err(EntryPointError::NotFound {
                file: MANAGE_PY,
                root: root.to_path_buf(),
            });
        };

        let mut candidates: Vec<PathBuf> = found
            .into_iter()
            .filter(|(depth, _)| *depth == shallowest)
            .map(|(_, path)| path)
            .collect();

        if candidates.len() > 1 {
            candidates.sort();
            return Err(EntryPointError::Ambiguous {
                file: MANAGE_PY,
                candidates,
            });
        }

        let path = candidates.remove(0);
        debug!(path = %path.display(), "Found management entry point");
        Ok(path)
    }
}
