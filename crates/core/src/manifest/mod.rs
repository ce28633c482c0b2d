//! Catalog of installable dependencies and the mechanism to install them

mod mock;
mod r#trait;
mod yaml;

pub use mock::{MockManifest, ManifestCall};
pub use r#trait::{Manifest, ManifestError};
pub use yaml::{DefaultVersion, ManifestEntry, ManifestFile, YamlManifest, MANIFEST_FILE};
