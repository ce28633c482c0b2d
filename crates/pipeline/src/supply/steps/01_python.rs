use crate::step_trait::SupplyStep;
use crate::supply::SupplyContext;
use anyhow::{Context, Result};
use async_trait::async_trait;
use pybuildpack_core::{resolve, ResolvedDependency, VersionSpecifier};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const RUNTIME_FILE: &str = "runtime.txt";
const PYTHON: &str = "python";

pub struct InstallPythonStep;

/// Requested runtime from `runtime.txt`; empty when the file is absent.
pub fn read_runtime_specifier(build_dir: &Path) -> Result<VersionSpecifier> {
    let path = build_dir.join(RUNTIME_FILE);
    if !path.is_file() {
        return Ok(VersionSpecifier::empty());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let specifier = VersionSpecifier::parse(&raw);
    debug!(requested = %specifier, "Read {}", RUNTIME_FILE);
    Ok(specifier)
}

impl InstallPythonStep {
    fn select(&self, context: &SupplyContext, specifier: &VersionSpecifier) -> Result<ResolvedDependency> {
        let catalog = context
            .manifest
            .catalog(PYTHON)
            .context("Could not determine the default Python version")?;
        Ok(resolve(specifier, &catalog)?)
    }
}

#[async_trait]
impl SupplyStep for InstallPythonStep {
    fn name(&self) -> &'static str {
        "InstallPython"
    }

    async fn execute(&self, context: &mut SupplyContext) -> Result<()> {
        let specifier = read_runtime_specifier(context.build_dir())?;
        let dep = self.select(context, &specifier)?;
        info!(version = %dep.version, "Installing Python");

        let install_dir = context.python_dir();
        context
            .manifest
            .install_versioned(&dep, &install_dir)
            .await
            .with_context(|| format!("Could not install {}", dep))?;

        for dir in ["bin", "lib"] {
            context
                .stager
                .link_directory_in_dep_dir(&install_dir.join(dir), dir)?;
        }

        let dep_dir = context.dep_dir().to_path_buf();
        context.env.prepend_path("PATH", &dep_dir.join("bin"));
        context.env.set("PYTHONPATH", dep_dir.display().to_string());

        context.python = Some(dep);
        Ok(())
    }
}
