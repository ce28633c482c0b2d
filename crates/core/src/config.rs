use crate::env::BuildEnv;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_TMP_DIR: &str = "/tmp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Positional arguments handed over by the platform's staging process.
#[derive(Debug, Clone, Default)]
pub struct StagingArgs {
    pub build_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub deps_dir: Option<PathBuf>,
    pub deps_idx: Option<String>,
    pub profile_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct BuildpackConfig {
    pub build_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub deps_dir: PathBuf,
    pub deps_idx: String,
    /// Accepted for the platform's calling convention; startup scripts go to
    /// `dep_dir/profile.d` instead.
    pub profile_dir: Option<PathBuf>,
    pub buildpack_dir: PathBuf,
    pub tmp_dir: PathBuf,
    pub stack: Option<String>,
    pub collectstatic_disabled: bool,
    pub log_level: String,
    pub log_json: bool,
    inherited_env: BTreeMap<String, String>,
}

impl BuildpackConfig {
    /// Combine staging arguments with the process environment. This is the only
    /// place the process environment is read.
    pub fn from_args(args: StagingArgs) -> Result<Self, ConfigError> {
        let build_dir = args.build_dir.ok_or(ConfigError::MissingArgument("build_dir"))?;
        let cache_dir = args.cache_dir.ok_or(ConfigError::MissingArgument("cache_dir"))?;
        let deps_dir = args.deps_dir.ok_or(ConfigError::MissingArgument("deps_dir"))?;
        let deps_idx = args.deps_idx.ok_or(ConfigError::MissingArgument("deps_idx"))?;

        let buildpack_dir = match non_empty_var("BUILDPACK_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_buildpack_dir()?,
        };

        let tmp_dir = non_empty_var("TMPDIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TMP_DIR));

        Ok(Self {
            build_dir,
            cache_dir,
            deps_dir,
            deps_idx,
            profile_dir: args.profile_dir,
            buildpack_dir,
            tmp_dir,
            stack: non_empty_var("CF_STACK"),
            collectstatic_disabled: non_empty_var("DISABLE_COLLECTSTATIC").is_some(),
            log_level: log_level_from_env(),
            log_json: non_empty_var("PYBUILDPACK_LOG_JSON")
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(false),
            inherited_env: env::vars().collect(),
        })
    }

    pub fn dep_dir(&self) -> PathBuf {
        self.deps_dir.join(&self.deps_idx)
    }

    /// Snapshot of the parent environment for spawned commands.
    pub fn build_env(&self) -> BuildEnv {
        BuildEnv::inherit(self.inherited_env.clone())
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into().to_lowercase();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.build_dir.is_dir() {
            return Err(ConfigError::ValidationFailed(format!(
                "Build directory does not exist: {}",
                self.build_dir.display()
            )));
        }

        if let Err(e) = self.deps_idx.parse::<u32>() {
            return Err(ConfigError::ParseError {
                field: "deps_idx".to_string(),
                error: format!("'{}' is not a non-negative integer ({})", self.deps_idx, e),
            });
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.buildpack_dir.join(crate::manifest::MANIFEST_FILE)
    }
}

impl fmt::Display for BuildpackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Buildpack Configuration:")?;
        writeln!(f, "  Build Dir: {}", self.build_dir.display())?;
        writeln!(f, "  Cache Dir: {}", self.cache_dir.display())?;
        writeln!(f, "  Dep Dir: {}", self.dep_dir().display())?;
        if let Some(ref dir) = self.profile_dir {
            writeln!(f, "  Profile Dir: {}", dir.display())?;
        }
        writeln!(f, "  Buildpack Dir: {}", self.buildpack_dir.display())?;
        writeln!(f, "  Tmp Dir: {}", self.tmp_dir.display())?;
        writeln!(f, "  Stack: {}", self.stack.as_deref().unwrap_or("-"))?;
        writeln!(f, "  Collectstatic Disabled: {}", self.collectstatic_disabled)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn log_level_from_env() -> String {
    if non_empty_var("BP_DEBUG").is_some() {
        return "debug".to_string();
    }

    non_empty_var("PYBUILDPACK_LOG_LEVEL")
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
        .to_lowercase()
}

/// Binaries live in `<buildpack>/bin`.
fn default_buildpack_dir() -> Result<PathBuf, ConfigError> {
    let exe = env::current_exe().map_err(|e| ConfigError::ParseError {
        field: "BUILDPACK_DIR".to_string(),
        error: e.to_string(),
    })?;

    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            ConfigError::ValidationFailed(format!(
                "Cannot derive buildpack directory from {}",
                exe.display()
            ))
        })
}
