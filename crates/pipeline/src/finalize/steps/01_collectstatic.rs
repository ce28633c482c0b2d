use crate::finalize::FinalizeContext;
use crate::probe::{requirements_contain, Probe};
use crate::step_trait::FinalizeStep;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, error, info};

pub const DJANGO_MARKERS: [&str; 2] = ["django", "Django"];

/// Block shown when asset collection fails, pointing at the opt-out variable.
pub fn remediation_message(manage_py: &Path) -> String {
    format!(
        " !     Error while running '$ python {} collectstatic --noinput'.\n\
        \x20      See traceback above for details.\n\
         \n\
        \x20      You may need to update application code to resolve this error.\n\
        \x20      Or, you can disable collectstatic for this application:\n\
         \n\
        \x20         $ cf set-env <app> DISABLE_COLLECTSTATIC 1\n\
         \n\
        \x20      https://devcenter.heroku.com/articles/django-assets",
        manage_py.display()
    )
}

pub struct CollectStaticStep;

#[async_trait]
impl FinalizeStep for CollectStaticStep {
    fn name(&self) -> &'static str {
        "CollectStatic"
    }

    async fn execute(&self, context: &mut FinalizeContext) -> Result<()> {
        if context.collectstatic_disabled {
            debug!("DISABLE_COLLECTSTATIC is set, skipping");
            return Ok(());
        }

        let probe = requirements_contain(
            context.runner.as_ref(),
            context.build_dir(),
            &context.env,
            &DJANGO_MARKERS,
        )
        .await;
        match probe {
            Probe::Present => {}
            Probe::Absent => {
                debug!("Django not listed, skipping collectstatic");
                return Ok(());
            }
            Probe::Failed(err) => {
                return Err(err).context("Could not check requirements for Django");
            }
        }

        let manage_py = context
            .finder
            .find_management_entry_point(context.build_dir())?;

        info!("Running python {} collectstatic --noinput --traceback", manage_py.display());
        let invocation = context
            .command("python")
            .arg(manage_py.display().to_string())
            .args(["collectstatic", "--noinput", "--traceback"]);

        if let Err(err) = context.runner.run(&invocation).await {
            error!("{}", remediation_message(&manage_py));
            return Err(err).context("collectstatic failed");
        }

        Ok(())
    }
}
