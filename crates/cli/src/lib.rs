pub mod cli;

use anyhow::{Context, Result};
use cli::{Phase, StagingCli};
use pybuildpack_core::logging::{init_logging, parse_level, LoggingConfig};
use pybuildpack_core::{
    BuildpackConfig, DirStager, ManagePyFinder, SystemCommandRunner, YamlManifest,
};
use pybuildpack_pipeline::{
    FinalizeContext, FinalizeOrchestrator, SupplyContext, SupplyOrchestrator,
};
use std::sync::Arc;
use tracing::debug;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run one phase to completion and return the process exit code.
pub async fn run(phase: Phase, cli: StagingCli) -> i32 {
    match execute(phase, &cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("**ERROR** {:#}", err);
            1
        }
    }
}

async fn execute(phase: Phase, cli: &StagingCli) -> Result<()> {
    let config = BuildpackConfig::from_args(cli.staging_args())?;
    let level = cli.log_level(&config.log_level);
    let config = config.with_log_level(level);

    init_logging(LoggingConfig::with_level(parse_level(&config.log_level)).json(config.log_json));
    debug!("{} v{} starting", phase.name(), VERSION);
    debug!("{}", config);

    config.validate()?;

    match phase {
        Phase::Supply => supply(&config).await,
        Phase::Finalize => finalize(&config).await,
    }
}

pub async fn supply(config: &BuildpackConfig) -> Result<()> {
    let manifest = YamlManifest::load(&config.manifest_path(), config.stack.clone())
        .context("Could not load the buildpack manifest")?;
    let stager = DirStager::new(&config.build_dir, &config.deps_dir, &config.deps_idx);

    let mut context = SupplyContext::new(
        Arc::new(stager),
        Arc::new(manifest),
        Arc::new(SystemCommandRunner::new()),
        config.build_env(),
        &config.tmp_dir,
    );

    SupplyOrchestrator::new()
        .execute(&mut context)
        .await
        .context("Could not supply Python")
}

pub async fn finalize(config: &BuildpackConfig) -> Result<()> {
    let stager = DirStager::new(&config.build_dir, &config.deps_dir, &config.deps_idx);

    let mut context = FinalizeContext::from_dep_dir(
        Arc::new(stager),
        Arc::new(SystemCommandRunner::new()),
        Arc::new(ManagePyFinder::new()),
        config.build_env(),
        config.collectstatic_disabled,
    )
    .context("Could not load the environment written by supply")?;

    FinalizeOrchestrator::new()
        .execute(&mut context)
        .await
        .context("Could not finalize Python")
}
