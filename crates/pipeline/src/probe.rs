//! Presence checks against the application's requirements file.
//!
//! `pip-grep` exits 0 when a marker is listed and 1 when none is. Anything else
//! (the tool missing, a crash, another exit status) is a broken probe and is
//! kept apart from a plain "not listed" answer.

use pybuildpack_core::{BuildEnv, CommandError, CommandRunner, Invocation};
use std::path::Path;
use tracing::debug;

pub const REQUIREMENTS_FILE: &str = "requirements.txt";

const ABSENT_EXIT_CODE: i32 = 1;

#[derive(Debug)]
pub enum Probe {
    Present,
    Absent,
    Failed(CommandError),
}

impl Probe {
    pub fn from_result<T>(result: Result<T, CommandError>) -> Self {
        match result {
            Ok(_) => Probe::Present,
            Err(err) if err.exit_code() == Some(ABSENT_EXIT_CODE) => Probe::Absent,
            Err(err) => Probe::Failed(err),
        }
    }
}

/// Whether any of `markers` is listed in `build_dir/requirements.txt`.
///
/// A missing requirements file is `Absent` without running the tool.
pub async fn requirements_contain(
    runner: &dyn CommandRunner,
    build_dir: &Path,
    env: &BuildEnv,
    markers: &[&str],
) -> Probe {
    if !build_dir.join(REQUIREMENTS_FILE).is_file() {
        debug!("No {} to probe", REQUIREMENTS_FILE);
        return Probe::Absent;
    }

    let invocation = Invocation::new("pip-grep", build_dir)
        .args(["-s", REQUIREMENTS_FILE])
        .args(markers.iter().copied())
        .envs(env.iter());

    let probe = Probe::from_result(runner.output(&invocation).await);
    debug!(markers = ?markers, probe = ?probe, "Probed requirements");
    probe
}
