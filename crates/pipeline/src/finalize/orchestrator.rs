use super::context::FinalizeContext;
use super::steps::collectstatic::CollectStaticStep;
use crate::step_trait::{run_step, FinalizeStep};
use anyhow::Result;
use std::time::Instant;
use tracing::info;

pub struct FinalizeOrchestrator {
    steps: Vec<Box<dyn FinalizeStep>>,
}

impl Default for FinalizeOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl FinalizeOrchestrator {
    pub fn new() -> Self {
        Self::with_steps(vec![Box::new(CollectStaticStep)])
    }

    pub fn with_steps(steps: Vec<Box<dyn FinalizeStep>>) -> Self {
        Self { steps }
    }

    pub async fn execute(&self, context: &mut FinalizeContext) -> Result<()> {
        let start = Instant::now();
        info!(build_dir = %context.build_dir().display(), "Finalizing Python");

        for step in &self.steps {
            run_step(step.name(), step.execute(context)).await?;
        }

        info!(total_time_ms = start.elapsed().as_millis(), "Finalize complete");
        Ok(())
    }
}
