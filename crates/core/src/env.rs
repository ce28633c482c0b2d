//! Build-time environment overlay.
//!
//! Steps never mutate the process environment. Variables they need to hand
//! to later steps are recorded here and applied to every spawned command.

use crate::stager::StagerError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    vars: BTreeMap<String, String>,
    inherited: BTreeMap<String, String>,
}

impl BuildEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a snapshot of the parent environment. The snapshot is only
    /// consulted when a path-list variable is extended.
    pub fn inherit<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: BTreeMap::new(),
            inherited: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Rebuild the overlay a previous phase persisted under `dep_dir/env`, with
    /// `dep_dir/bin` first on `PATH`.
    pub fn from_dep_dir(dep_dir: &Path, inherited: BuildEnv) -> Result<Self, StagerError> {
        let mut env = inherited;
        let env_dir = dep_dir.join("env");

        if env_dir.is_dir() {
            let entries = fs::read_dir(&env_dir).map_err(|e| StagerError::io("read", &env_dir, e))?;
            let mut files = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| StagerError::io("read", &env_dir, e))?;
                if entry.path().is_file() {
                    files.push(entry.path());
                }
            }
            files.sort();

            for path in files {
                let Some(key) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let value = fs::read_to_string(&path).map_err(|e| StagerError::io("read", &path, e))?;
                debug!(key, "Loaded persisted variable");
                env.set(key, value.trim_end_matches('\n'));
            }
        }

        env.prepend_path("PATH", &dep_dir.join("bin"));
        Ok(env)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Value visible to a spawned command: the overlay first, then the parent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .or_else(|| self.inherited.get(key))
            .map(String::as_str)
    }

    /// Put `dir` in front of the colon-separated list stored in `key`.
    pub fn prepend_path(&mut self, key: &str, dir: &Path) {
        let dir = dir.display().to_string();
        let value = match self.get(key) {
            Some(existing) if !existing.is_empty() => format!("{}:{}", dir, existing),
            _ => dir,
        };
        self.set(key, value);
    }

    /// Overlay variables only, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
