use super::{Stager, StagerError};
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Stager backed by real directories on disk.
pub struct DirStager {
    build_dir: PathBuf,
    dep_dir: PathBuf,
    deps_idx: String,
}

impl DirStager {
    pub fn new(build_dir: impl Into<PathBuf>, deps_dir: impl AsRef<Path>, deps_idx: &str) -> Self {
        Self {
            build_dir: build_dir.into(),
            dep_dir: deps_dir.as_ref().join(deps_idx),
            deps_idx: deps_idx.to_string(),
        }
    }

    fn write_file(&self, subdir: &str, name: &str, contents: &str) -> Result<(), StagerError> {
        let dir = self.dep_dir.join(subdir);
        fs::create_dir_all(&dir).map_err(|e| StagerError::io("create", &dir, e))?;

        let path = dir.join(name);
        fs::write(&path, contents).map_err(|e| StagerError::io("write", &path, e))?;
        debug!(path = %path.display(), "Wrote staging file");
        Ok(())
    }
}

impl Stager for DirStager {
    fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    fn dep_dir(&self) -> &Path {
        &self.dep_dir
    }

    fn deps_idx(&self) -> &str {
        &self.deps_idx
    }

    fn link_directory_in_dep_dir(&self, src: &Path, dest_subdir: &str) -> Result<(), StagerError> {
        if !src.is_dir() {
            return Err(StagerError::MissingSource(src.to_path_buf()));
        }

        let dest = self.dep_dir.join(dest_subdir);
        fs::create_dir_all(&dest).map_err(|e| StagerError::io("create", &dest, e))?;

        let entries = fs::read_dir(src).map_err(|e| StagerError::io("read", src, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| StagerError::io("read", src, e))?;
            let link = dest.join(entry.file_name());

            if let Ok(existing) = fs::symlink_metadata(&link) {
                if !existing.file_type().is_symlink() {
                    debug!(path = %link.display(), "Keeping existing entry");
                    continue;
                }
                fs::remove_file(&link).map_err(|e| StagerError::io("replace", &link, e))?;
            }

            let target = relative_path(&dest, &entry.path());
            symlink(&target, &link).map_err(|e| StagerError::io("link", &link, e))?;
        }

        debug!(src = %src.display(), dest = %dest.display(), "Linked directory");
        Ok(())
    }

    fn write_env_file(&self, key: &str, value: &str) -> Result<(), StagerError> {
        self.write_file("env", key, value)
    }

    fn write_profile_d(&self, name: &str, contents: &str) -> Result<(), StagerError> {
        self.write_file("profile.d", name, contents)
    }
}

/// Path to `target` as seen from directory `base`.
fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component> = base.components().collect();
    let target: Vec<Component> = target.components().collect();

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    relative
}
