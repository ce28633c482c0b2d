use pybuildpack_core::{BuildEnv, CommandRunner, EntryPointFinder, Invocation, Stager, StagerError};
use std::path::Path;
use std::sync::Arc;

pub struct FinalizeContext {
    pub stager: Arc<dyn Stager>,
    pub runner: Arc<dyn CommandRunner>,
    pub finder: Arc<dyn EntryPointFinder>,
    pub env: BuildEnv,
    pub collectstatic_disabled: bool,
}

impl FinalizeContext {
    /// Context whose environment is rebuilt from `stager.dep_dir()` on top of `inherited`.
    pub fn from_dep_dir(
        stager: Arc<dyn Stager>,
        runner: Arc<dyn CommandRunner>,
        finder: Arc<dyn EntryPointFinder>,
        inherited: BuildEnv,
        collectstatic_disabled: bool,
    ) -> Result<Self, StagerError> {
        let env = BuildEnv::from_dep_dir(stager.dep_dir(), inherited)?;
        Ok(Self {
            stager,
            runner,
            finder,
            env,
            collectstatic_disabled,
        })
    }

    pub fn build_dir(&self) -> &Path {
        self.stager.build_dir()
    }

    pub fn command(&self, program: &str) -> Invocation {
        Invocation::new(program, self.build_dir()).envs(self.env.iter())
    }
}
