use super::{Stager, StagerError};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagerCall {
    Link { src: PathBuf, dest: String },
    EnvFile { key: String, value: String },
    ProfileD { name: String, contents: String },
}

/// Stager that records what would have been staged without touching the disk.
pub struct MockStager {
    build_dir: PathBuf,
    dep_dir: PathBuf,
    deps_idx: String,
    calls: Mutex<Vec<StagerCall>>,
}

impl MockStager {
    pub fn new(build_dir: impl Into<PathBuf>, deps_dir: impl AsRef<Path>, deps_idx: &str) -> Self {
        Self {
            build_dir: build_dir.into(),
            dep_dir: deps_dir.as_ref().join(deps_idx),
            deps_idx: deps_idx.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<StagerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn links(&self) -> Vec<(PathBuf, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StagerCall::Link { src, dest } => Some((src, dest)),
                _ => None,
            })
            .collect()
    }

    pub fn env_file(&self, key: &str) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            StagerCall::EnvFile { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }

    pub fn profile_d(&self, name: &str) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            StagerCall::ProfileD { name: n, contents } if n == name => Some(contents),
            _ => None,
        })
    }

    fn record(&self, call: StagerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Stager for MockStager {
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
        self.record(StagerCall::Link {
            src: src.to_path_buf(),
            dest: dest_subdir.to_string(),
        });
        Ok(())
    }

    fn write_env_file(&self, key: &str, value: &str) -> Result<(), StagerError> {
        self.record(StagerCall::EnvFile {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn write_profile_d(&self, name: &str, contents: &str) -> Result<(), StagerError> {
        self.record(StagerCall::ProfileD {
            name: name.to_string(),
            contents: contents.to_string(),
        });
        Ok(())
    }
}
