use crate::version::{ResolvedDependency, VersionCatalog};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("dependency {name} {version} is not in the manifest")]
    UnknownDependency { name: String, version: String },

    #[error("no default version of {0} in the manifest")]
    NoDefaultVersion(String),

    #[error("expected exactly one version of {name}, found {}", .versions.len())]
    NotOnlyVersion { name: String, versions: Vec<String> },

    #[error("failed to download {uri}: {source}")]
    Download {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read {uri}: {source}")]
    Fetch {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    #[error("checksum mismatch for {name} {version}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        version: String,
        expected: String,
        actual: String,
    },

    #[error("failed to install into {}: {source}", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Catalog of versioned components and the way to install them.
#[async_trait]
pub trait Manifest: Send + Sync {
    /// Every available version of `name`, in manifest order.
    fn all_versions(&self, name: &str) -> Vec<String>;

    /// The version the manifest designates as default for `name`.
    fn default_version(&self, name: &str) -> Result<ResolvedDependency, ManifestError>;

    async fn install_versioned(
        &self,
        dep: &ResolvedDependency,
        dest: &Path,
    ) -> Result<(), ManifestError>;

    /// Install the single version of `name`; fails if the manifest lists several.
    async fn install_unversioned(
        &self,
        name: &str,
        dest: &Path,
    ) -> Result<ResolvedDependency, ManifestError> {
        let mut versions = self.all_versions(name);
        if versions.len() != 1 {
            return Err(ManifestError::NotOnlyVersion {
                name: name.to_string(),
                versions,
            });
        }

        let dep = ResolvedDependency::new(name, versions.remove(0));
        self.install_versioned(&dep, dest).await?;
        Ok(dep)
    }

    fn catalog(&self, name: &str) -> Result<VersionCatalog, ManifestError> {
        let default = self.default_version(name)?;
        Ok(VersionCatalog::new(
            name,
            self.all_versions(name),
            default.version,
        ))
    }
}
