use crate::probe::REQUIREMENTS_FILE;
use crate::step_trait::SupplyStep;
use crate::supply::SupplyContext;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct InstallRequirementsStep;

#[async_trait]
impl SupplyStep for InstallRequirementsStep {
    fn name(&self) -> &'static str {
        "InstallRequirements"
    }

    async fn execute(&self, context: &mut SupplyContext) -> Result<()> {
        if !context.has_requirements() {
            warn!("No {} found, skipping application packages", REQUIREMENTS_FILE);
            return Ok(());
        }

        info!("Installing application packages");
        // Editable checkouts land under the dep dir so they ship with the droplet.
        let src = format!("--src={}/src", context.dep_dir().display());
        let invocation = context.command("pip").args([
            "install",
            "-r",
            REQUIREMENTS_FILE,
            "--exists-action=w",
            src.as_str(),
        ]);

        context
            .runner
            .run(&invocation)
            .await
            .context("Could not install application packages")?;
        Ok(())
    }
}
