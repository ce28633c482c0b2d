use super::{Manifest, ManifestError};
use crate::version::ResolvedDependency;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestCall {
    pub dep: ResolvedDependency,
    pub dest: PathBuf,
}

/// In-memory manifest that records installs instead of performing them.
#[derive(Default)]
pub struct MockManifest {
    versions: HashMap<String, Vec<String>>,
    defaults: HashMap<String, String>,
    failing: HashSet<String>,
    installs: Mutex<Vec<ManifestCall>>,
}

impl MockManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, name: &str, versions: &[&str]) -> Self {
        self.versions.insert(
            name.to_string(),
            versions.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn with_default(mut self, name: &str, version: &str) -> Self {
        self.defaults.insert(name.to_string(), version.to_string());
        self
    }

    /// Make every install of `name` fail with `Extract`.
    pub fn with_failing_install(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn installs(&self) -> Vec<ManifestCall> {
        self.installs.lock().unwrap().clone()
    }

    pub fn installed(&self, name: &str) -> Option<ManifestCall> {
        self.installs().into_iter().find(|call| call.dep.name == name)
    }
}

#[async_trait]
impl Manifest for MockManifest {
    fn all_versions(&self, name: &str) -> Vec<String> {
        self.versions.get(name).cloned().unwrap_or_default()
    }

    fn default_version(&self, name: &str) -> Result<ResolvedDependency, ManifestError> {
        self.defaults
            .get(name)
            .map(|version| ResolvedDependency::new(name, version.clone()))
            .ok_or_else(|| ManifestError::NoDefaultVersion(name.to_string()))
    }

    async fn install_versioned(
        &self,
        dep: &ResolvedDependency,
        dest: &Path,
    ) -> Result<(), ManifestError> {
        if self.failing.contains(&dep.name) {
            return Err(ManifestError::Extract {
                path: dest.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "injected failure"),
            });
        }

        self.installs.lock().unwrap().push(ManifestCall {
            dep: dep.clone(),
            dest: dest.to_path_buf(),
        });
        Ok(())
    }
}
