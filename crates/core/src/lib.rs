pub mod command;
pub mod config;
pub mod entrypoint;
pub mod env;
pub mod logging;
pub mod manifest;
pub mod stager;
pub mod version;

pub use command::{
    CallKind, CommandError, CommandRunner, Invocation, MockCommandRunner, RecordedCall,
    SystemCommandRunner,
};
pub use config::{BuildpackConfig, ConfigError, StagingArgs};
pub use entrypoint::{EntryPointError, EntryPointFinder, ManagePyFinder, MockEntryPointFinder};
pub use env::BuildEnv;
pub use logging::{init_logging, LoggingConfig};
pub use manifest::{Manifest, ManifestCall, ManifestError, MockManifest, YamlManifest};
pub use stager::{DirStager, MockStager, Stager, StagerCall, StagerError};
pub use version::{
    resolve, ResolveError, ResolvedDependency, VersionCatalog, VersionSpecifier,
};
