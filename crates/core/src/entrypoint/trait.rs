use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntryPointError {
    #[error("no {file} found under {}", .root.display())]
    NotFound { file: &'static str, root: PathBuf },

    #[error("several {file} files at the same depth: {}", .candidates.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    Ambiguous {
        file: &'static str,
        candidates: Vec<PathBuf>,
    },

    #[error("failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },
}

pub trait EntryPointFinder: Send + Sync {
    /// Path of the most appropriate management script under `root`.
    fn find_management_entry_point(&self, root: &Path) -> Result<PathBuf, EntryPointError>;
}
