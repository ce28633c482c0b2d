use crate::probe::REQUIREMENTS_FILE;
use pybuildpack_core::{
    BuildEnv, CommandRunner, Invocation, Manifest, ResolvedDependency, Stager,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// State threaded through the supply steps.
///
/// `env` replaces process-wide environment mutation: steps record variables
/// there and every command built through [`SupplyContext::command`] receives them.
pub struct SupplyContext {
    pub stager: Arc<dyn Stager>,
    pub manifest: Arc<dyn Manifest>,
    pub runner: Arc<dyn CommandRunner>,
    pub env: BuildEnv,
    pub tmp_dir: PathBuf,
    pub python: Option<ResolvedDependency>,
}

impl SupplyContext {
    pub fn new(
        stager: Arc<dyn Stager>,
        manifest: Arc<dyn Manifest>,
        runner: Arc<dyn CommandRunner>,
        env: BuildEnv,
        tmp_dir: &Path,
    ) -> Self {
        Self {
            stager,
            manifest,
            runner,
            env,
            tmp_dir: tmp_dir.to_path_buf(),
            python: None,
        }
    }

    pub fn build_dir(&self) -> &Path {
        self.stager.build_dir()
    }

    pub fn dep_dir(&self) -> &Path {
        self.stager.dep_dir()
    }

    /// Install location of the interpreter and everything installed into it.
    pub fn python_dir(&self) -> PathBuf {
        self.dep_dir().join("python")
    }

    pub fn has_requirements(&self) -> bool {
        self.build_dir().join(REQUIREMENTS_FILE).is_file()
    }

    /// `program` run from `dir` with the current build environment.
    pub fn command_in(&self, program: &str, dir: &Path) -> Invocation {
        Invocation::new(program, dir).envs(self.env.iter())
    }

    /// `program` run from the build directory with the current build environment.
    pub fn command(&self, program: &str) -> Invocation {
        self.command_in(program, self.build_dir())
    }
}
