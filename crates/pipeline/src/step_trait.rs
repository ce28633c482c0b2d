use crate::finalize::FinalizeContext;
use crate::supply::SupplyContext;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Instant;
use tracing::{error, info};

/// One unit of the supply phase. Steps run once, in order, and the first error aborts.
#[async_trait]
pub trait SupplyStep: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, context: &mut SupplyContext) -> Result<()>;
}

#[async_trait]
pub trait FinalizeStep: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, context: &mut FinalizeContext) -> Result<()>;
}

/// Drive one step's future, logging start, duration and failure the same way
/// for both phases.
pub(crate) async fn run_step<F>(step_name: &'static str, step: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    info!(step = %step_name, "Starting step");

    let step_start = Instant::now();
    if let Err(err) = step.await {
        error!(step = %step_name, error = %format!("{:#}", err), "Step failed");
        return Err(err).with_context(|| format!("Step {} failed", step_name));
    }

    info!(
        step = %step_name,
        duration_ms = step_start.elapsed().as_millis(),
        "Step complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_step_passes_success_through() {
        run_step("Noop", async { Ok(()) }).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_step_names_failed_step() {
        let err = run_step("InstallPip", async { Err(anyhow::anyhow!("pip exploded")) })
            .await
            .unwrap_err();

        assert_eq!(format!("{:#}", err), "Step InstallPip failed: pip exploded");
    }
}
