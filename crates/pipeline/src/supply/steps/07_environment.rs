use crate::step_trait::SupplyStep;
use crate::supply::SupplyContext;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

pub const PROFILE_SCRIPT: &str = "python.sh";

const HASH_SEED: &str = "random";
const LOCALE: &str = "en_US.UTF-8";

/// Variables the application needs at run time, rooted at `dep_dir`.
pub fn runtime_variables(dep_dir: &Path) -> Vec<(&'static str, String)> {
    vec![
        ("LIBRARY_PATH", dep_dir.join("lib").display().to_string()),
        ("PYTHONPATH", dep_dir.display().to_string()),
        ("PYTHONHOME", dep_dir.join("python").display().to_string()),
        ("PYTHONHASHSEED", HASH_SEED.to_string()),
        ("PYTHONUNBUFFERED", "1".to_string()),
        ("LANG", LOCALE.to_string()),
    ]
}

/// Startup snippet. Paths go through `$DEPS_DIR` because the staging location
/// differs from the run-time one; the locale and hash seed keep user overrides.
pub fn profile_script(deps_idx: &str) -> String {
    let dep_dir = format!("$DEPS_DIR/{}", deps_idx);
    format!(
        "export LANG=${{LANG:-{locale}}}\n\
         export PYTHONHASHSEED=${{PYTHONHASHSEED:-{seed}}}\n\
         export PYTHONPATH={dep_dir}\n\
         export PYTHONHOME={dep_dir}/python\n\
         export PYTHONUNBUFFERED=1\n\
         export LIBRARY_PATH={dep_dir}/lib${{LIBRARY_PATH:+:$LIBRARY_PATH}}\n",
        locale = LOCALE,
        seed = HASH_SEED,
        dep_dir = dep_dir,
    )
}

pub struct ConfigureEnvironmentStep;

#[async_trait]
impl SupplyStep for ConfigureEnvironmentStep {
    fn name(&self) -> &'static str {
        "ConfigureEnvironment"
    }

    async fn execute(&self, context: &mut SupplyContext) -> Result<()> {
        let dep_dir = context.dep_dir().to_path_buf();

        for (key, value) in runtime_variables(&dep_dir) {
            context.stager.write_env_file(key, &value)?;
            context.env.set(key, value);
        }

        let script = profile_script(context.stager.deps_idx());
        context.stager.write_profile_d(PROFILE_SCRIPT, &script)?;
        debug!(script = PROFILE_SCRIPT, "Wrote startup script");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_script() {
        let script = profile_script("2");

        assert!(script.contains("export LANG=${LANG:-en_US.UTF-8}\n"));
        assert!(script.contains("export PYTHONHASHSEED=${PYTHONHASHSEED:-random}\n"));
        assert!(script.contains("export PYTHONPATH=$DEPS_DIR/2\n"));
        assert!(script.contains("export PYTHONHOME=$DEPS_DIR/2/python\n"));
        assert!(script.contains("export LIBRARY_PATH=$DEPS_DIR/2/lib${LIBRARY_PATH:+:$LIBRARY_PATH}\n"));
    }

    #[test]
    fn test_runtime_variables() {
        let vars = runtime_variables(Path::new("/deps/0"));
        let get = |key: &str| vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str());

        assert_eq!(get("LIBRARY_PATH"), Some("/deps/0/lib"));
        assert_eq!(get("PYTHONHOME"), Some("/deps/0/python"));
        assert_eq!(get("PYTHONHASHSEED"), Some("random"));
        assert_eq!(get("LANG"), Some("en_US.UTF-8"));
        assert_eq!(vars.len(), 6);
    }
}
