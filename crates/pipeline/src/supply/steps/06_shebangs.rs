use crate::shebang::normalize_shebangs;
use crate::step_trait::SupplyStep;
use crate::supply::SupplyContext;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

pub struct NormalizeShebangsStep;

#[async_trait]
impl SupplyStep for NormalizeShebangsStep {
    fn name(&self) -> &'static str {
        "NormalizeShebangs"
    }

    async fn execute(&self, context: &mut SupplyContext) -> Result<()> {
        let bin_dir = context.python_dir().join("bin");
        let rewritten = normalize_shebangs(&bin_dir)
            .with_context(|| format!("Could not rewrite scripts in {}", bin_dir.display()))?;
        debug!(rewritten, "Normalized scripts");
        Ok(())
    }
}
