use crate::step_trait::SupplyStep;
use crate::supply::SupplyContext;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{error, info};

/// setuptools must be importable before pip's own `setup.py` runs.
pub const PACKAGING_TOOLS: [&str; 2] = ["setuptools", "pip"];

pub struct InstallPipStep;

#[async_trait]
impl SupplyStep for InstallPipStep {
    fn name(&self) -> &'static str {
        "InstallPip"
    }

    async fn execute(&self, context: &mut SupplyContext) -> Result<()> {
        let prefix = format!("--prefix={}", context.python_dir().display());

        for name in PACKAGING_TOOLS {
            let unpack_dir = context.tmp_dir.join(name);
            let dep = context
                .manifest
                .install_unversioned(name, &unpack_dir)
                .await
                .with_context(|| format!("Could not fetch {}", name))?;
            info!(version = %dep.version, "Installing {}", name);

            let source_dir = unpack_dir.join(format!("{}-{}", name, dep.version));
            let invocation = context
                .command_in("python", &source_dir)
                .args(["setup.py", "install", prefix.as_str()]);

            if let Err(err) = context.runner.output(&invocation).await {
                error!("{}", err.output());
                return Err(err).with_context(|| format!("Could not install {}", dep));
            }
        }

        let python_dir = context.python_dir();
        for dir in ["bin", "lib", "include"] {
            context
                .stager
                .link_directory_in_dep_dir(&python_dir.join(dir), dir)?;
        }
        context
            .stager
            .link_directory_in_dep_dir(&python_dir.join("lib").join("pkgconfig"), "pkgconfig")?;

        Ok(())
    }
}
