use clap::{CommandFactory, FromArgMatches, Parser};
use pybuildpack_core::StagingArgs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Supply,
    Finalize,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Supply => "supply",
            Phase::Finalize => "finalize",
        }
    }

    fn about(&self) -> &'static str {
        match self {
            Phase::Supply => "Install Python, pip and the application's requirements into the dependency directory",
            Phase::Finalize => "Run application-specific steps (Django collectstatic) after all dependencies are supplied",
        }
    }
}

/// Arguments the staging process passes to every buildpack phase
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct StagingCli {
    #[arg(value_name = "BUILD_DIR", help = "Application source directory")]
    pub build_dir: Option<PathBuf>,

    #[arg(value_name = "CACHE_DIR", help = "Directory persisted between stagings")]
    pub cache_dir: Option<PathBuf>,

    #[arg(value_name = "DEPS_DIR", help = "Root of all buildpacks' dependency directories")]
    pub deps_dir: Option<PathBuf>,

    #[arg(value_name = "DEPS_IDX", help = "Index of this buildpack's directory under DEPS_DIR")]
    pub deps_idx: Option<String>,

    #[arg(value_name = "PROFILE_DIR", help = "Directory for startup scripts (finalize only)")]
    pub profile_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Debug output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl StagingCli {
    /// Parse the process arguments under the binary name of `phase`.
    pub fn parse_for(phase: Phase) -> Self {
        let matches = Self::command()
            .name(phase.name())
            .about(phase.about())
            .get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    pub fn staging_args(&self) -> StagingArgs {
        StagingArgs {
            build_dir: self.build_dir.clone(),
            cache_dir: self.cache_dir.clone(),
            deps_dir: self.deps_dir.clone(),
            deps_idx: self.deps_idx.clone(),
            profile_dir: self.profile_dir.clone(),
        }
    }

    /// Flag level, then `-v`/`-q`, then whatever the environment asked for.
    pub fn log_level(&self, from_env: &str) -> String {
        if let Some(level) = &self.log_level {
            level.to_lowercase()
        } else if self.verbose {
            "debug".to_string()
        } else if self.quiet {
            "error".to_string()
        } else {
            from_env.to_string()
        }
    }
}
