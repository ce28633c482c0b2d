use crate::step_trait::SupplyStep;
use crate::supply::SupplyContext;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

const PIP_POP: &str = "pip-pop";

/// Installs the vendored `pip-grep` helper from a local wheel directory.
pub struct InstallPipPopStep;

#[async_trait]
impl SupplyStep for InstallPipPopStep {
    fn name(&self) -> &'static str {
        "InstallPipPop"
    }

    async fn execute(&self, context: &mut SupplyContext) -> Result<()> {
        let wheel_dir = context.tmp_dir.join(PIP_POP);
        let dep = context
            .manifest
            .install_unversioned(PIP_POP, &wheel_dir)
            .await
            .with_context(|| format!("Could not fetch {}", PIP_POP))?;
        info!(version = %dep.version, "Installing {}", PIP_POP);

        let invocation = context.command("pip").args([
            "install".to_string(),
            PIP_POP.to_string(),
            "--exists-action=w".to_string(),
            "--no-index".to_string(),
            format!("--find-links={}", wheel_dir.display()),
        ]);
        context
            .runner
            .run(&invocation)
            .await
            .with_context(|| format!("Could not install {}", dep))?;

        context
            .stager
            .link_directory_in_dep_dir(&context.python_dir().join("bin"), "bin")?;
        Ok(())
    }
}
