use super::context::SupplyContext;
use super::steps::{
    environment::ConfigureEnvironmentStep, native_libs::InstallNativeLibrariesStep,
    pip::InstallPipStep, pip_pop::InstallPipPopStep, python::InstallPythonStep,
    requirements::InstallRequirementsStep, shebangs::NormalizeShebangsStep,
};
use crate::step_trait::{run_step, SupplyStep};
use anyhow::Result;
use std::time::Instant;
use tracing::info;

pub struct SupplyOrchestrator {
    steps: Vec<Box<dyn SupplyStep>>,
}

impl Default for SupplyOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl SupplyOrchestrator {
    pub fn new() -> Self {
        Self::with_steps(vec![
            Box::new(InstallPythonStep),
            Box::new(InstallPipStep),
            Box::new(InstallPipPopStep),
            Box::new(InstallNativeLibrariesStep),
            Box::new(InstallRequirementsStep),
            Box::new(NormalizeShebangsStep),
            Box::new(ConfigureEnvironmentStep),
        ])
    }

    pub fn with_steps(steps: Vec<Box<dyn SupplyStep>>) -> Self {
        Self { steps }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub async fn execute(&self, context: &mut SupplyContext) -> Result<()> {
        let start = Instant::now();
        info!(
            build_dir = %context.build_dir().display(),
            dep_dir = %context.dep_dir().display(),
            "Supplying Python"
        );

        for step in &self.steps {
            run_step(step.name(), step.execute(context)).await?;
        }

        info!(
            python = ?context.python.as_ref().map(|dep| dep.version.as_str()),
            total_time_ms = start.elapsed().as_millis(),
            "Supply complete"
        );
        Ok(())
    }
}
