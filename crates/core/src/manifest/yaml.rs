//! `manifest.yml` backed catalog.
//!
//! Artifacts are fetched from `file://` URIs, paths relative to the buildpack
//! directory, or over HTTP(S). Every artifact is checked against its SHA-256
//! before it is unpacked.

use super::{Manifest, ManifestError};
use crate::version::{find_matching_version, ResolvedDependency};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MANIFEST_FILE: &str = "manifest.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestFile {
    #[serde(default)]
    pub default_versions: Vec<DefaultVersion>,
    #[serde(default)]
    pub dependencies: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultVersion {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub version: String,
    pub uri: String,
    pub sha256: String,
    #[serde(default)]
    pub cf_stacks: Vec<String>,
}

impl ManifestEntry {
    fn supports_stack(&self, stack: Option<&str>) -> bool {
        match stack {
            Some(stack) if !self.cf_stacks.is_empty() => self.cf_stacks.iter().any(|s| s == stack),
            _ => true,
        }
    }

    fn is_tarball(&self) -> bool {
        self.uri.ends_with(".tar.gz") || self.uri.ends_with(".tgz")
    }

    fn file_name(&self) -> &str {
        self.uri.rsplit('/').next().unwrap_or(&self.uri)
    }
}

pub struct YamlManifest {
    root_dir: PathBuf,
    file: ManifestFile,
    stack: Option<String>,
}

impl YamlManifest {
    /// Load a manifest file. Relative artifact URIs resolve against its directory.
    pub fn load(path: &Path, stack: Option<String>) -> Result<Self, ManifestError> {
        let root_dir = path.parent().unwrap_or(Path::new("."));
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file = serde_yaml::from_str(&content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(root_dir, file, stack))
    }

    pub fn new(root_dir: &Path, file: ManifestFile, stack: Option<String>) -> Self {
        Self {
            root_dir: root_dir.to_path_buf(),
            file,
            stack,
        }
    }

    fn entries<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ManifestEntry> + 'a {
        let stack = self.stack.as_deref();
        self.file
            .dependencies
            .iter()
            .filter(move |entry| entry.name == name && entry.supports_stack(stack))
    }

    fn entry(&self, dep: &ResolvedDependency) -> Result<&ManifestEntry, ManifestError> {
        let stack = self.stack.as_deref();
        self.file
            .dependencies
            .iter()
            .find(|entry| {
                entry.name == dep.name && entry.version == dep.version && entry.supports_stack(stack)
            })
            .ok_or_else(|| ManifestError::UnknownDependency {
                name: dep.name.clone(),
                version: dep.version.clone(),
            })
    }

    async fn fetch(&self, entry: &ManifestEntry) -> Result<Vec<u8>, ManifestError> {
        if entry.uri.starts_with("http://") || entry.uri.starts_with("https://") {
            debug!(uri = %entry.uri, "Downloading dependency");
            let download_err = |source| ManifestError::Download {
                uri: entry.uri.clone(),
                source,
            };
            let response = reqwest::get(&entry.uri)
                .await
                .and_then(|r| r.error_for_status())
                .map_err(download_err)?;
            let bytes = response.bytes().await.map_err(download_err)?;
            return Ok(bytes.to_vec());
        }

        let path = match entry.uri.strip_prefix("file://") {
            Some(path) => PathBuf::from(path),
            None => self.root_dir.join(&entry.uri),
        };
        debug!(path = %path.display(), "Reading dependency from disk");
        tokio::fs::read(&path)
            .await
            .map_err(|source| ManifestError::Fetch {
                uri: entry.uri.clone(),
                source,
            })
    }
}

fn verify_checksum(entry: &ManifestEntry, bytes: &[u8]) -> Result<(), ManifestError> {
    let actual = hex::encode(Sha256::digest(bytes));
    if actual.eq_ignore_ascii_case(&entry.sha256) {
        Ok(())
    } else {
        Err(ManifestError::ChecksumMismatch {
            name: entry.name.clone(),
            version: entry.version.clone(),
            expected: entry.sha256.clone(),
            actual,
        })
    }
}

fn unpack(bytes: &[u8], tarball: bool, file_name: &str, dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    if tarball {
        tar::Archive::new(GzDecoder::new(bytes)).unpack(dest)
    } else {
        fs::write(dest.join(file_name), bytes)
    }
}

#[async_trait]
impl Manifest for YamlManifest {
    fn all_versions(&self, name: &str) -> Vec<String> {
        self.entries(name).map(|entry| entry.version.clone()).collect()
    }

    fn default_version(&self, name: &str) -> Result<ResolvedDependency, ManifestError> {
        let constraint = self
            .file
            .default_versions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.version.as_str())
            .ok_or_else(|| ManifestError::NoDefaultVersion(name.to_string()))?;

        let versions = self.all_versions(name);
        let version = find_matching_version(constraint, &versions)
            .ok_or_else(|| ManifestError::NoDefaultVersion(name.to_string()))?;

        Ok(ResolvedDependency::new(name, version))
    }

    async fn install_versioned(
        &self,
        dep: &ResolvedDependency,
        dest: &Path,
    ) -> Result<(), ManifestError> {
        let entry = self.entry(dep)?.clone();
        info!(dependency = %dep, dest = %dest.display(), "Installing");

        let bytes = self.fetch(&entry).await?;
        verify_checksum(&entry, &bytes)?;

        let dest_path = dest.to_path_buf();
        let extract_err = |source| ManifestError::Extract {
            path: dest.to_path_buf(),
            source,
        };
        tokio::task::spawn_blocking(move || {
            unpack(&bytes, entry.is_tarball(), entry.file_name(), &dest_path)
        })
        .await
        .map_err(|join| extract_err(std::io::Error::new(std::io::ErrorKind::Other, join)))?
        .map_err(extract_err)
    }
}
