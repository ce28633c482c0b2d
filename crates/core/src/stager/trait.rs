use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StagerError {
    #[error("cannot link {}: directory does not exist", .0.display())]
    MissingSource(PathBuf),

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StagerError {
    pub(crate) fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        StagerError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Directories owned by one staging run and the ways steps publish into them.
pub trait Stager: Send + Sync {
    /// Application source directory.
    fn build_dir(&self) -> &Path;

    /// Dependency root for this buildpack (`deps_dir/deps_idx`).
    fn dep_dir(&self) -> &Path;

    fn deps_idx(&self) -> &str;

    /// Expose every entry of `src` under `dep_dir/dest_subdir` via symlinks.
    fn link_directory_in_dep_dir(&self, src: &Path, dest_subdir: &str) -> Result<(), StagerError>;

    /// Persist `key=value` for later buildpacks and the run-time environment loader.
    fn write_env_file(&self, key: &str, value: &str) -> Result<(), StagerError>;

    /// Persist a shell snippet sourced at application start.
    fn write_profile_d(&self, name: &str, contents: &str) -> Result<(), StagerError>;
}
