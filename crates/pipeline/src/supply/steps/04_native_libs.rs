use crate::probe::{requirements_contain, Probe};
use crate::step_trait::SupplyStep;
use crate::supply::SupplyContext;
use anyhow::{Context, Result};
use async_trait::async_trait;
use pybuildpack_core::StagerError;
use tracing::{debug, info, warn};

/// A native library installed only when the requirements list one of its markers.
#[derive(Debug, Clone, Copy)]
pub struct NativeBundle {
    pub dependency: &'static str,
    pub env_var: &'static str,
    pub markers: &'static [&'static str],
    /// `(source below the install dir, destination under the dep dir)`
    pub links: &'static [(&'static str, &'static str)],
}

pub const MEMCACHED: NativeBundle = NativeBundle {
    dependency: "libmemcache",
    env_var: "LIBMEMCACHED",
    markers: &["pylibmc"],
    links: &[
        ("lib", "lib"),
        ("lib/sasl2", "lib"),
        ("lib/pkgconfig", "pkgconfig"),
        ("include", "include"),
    ],
};

pub const FFI: NativeBundle = NativeBundle {
    dependency: "libffi",
    env_var: "LIBFFI",
    markers: &[
        "argon2-cffi",
        "bcrypt",
        "cairocffi",
        "cffi",
        "cryptography",
        "django[argon2]",
        "Django[argon2]",
        "django[bcrypt]",
        "Django[bcrypt]",
        "misaka",
        "PyNaCl",
        "pyOpenSSL",
        "PyOpenSSL",
        "requests[security]",
        "xattr",
    ],
    links: &[
        ("lib", "lib"),
        ("lib/pkgconfig", "pkgconfig"),
        ("include", "include"),
    ],
};

pub struct InstallNativeLibrariesStep;

impl InstallNativeLibrariesStep {
    async fn install(&self, context: &mut SupplyContext, bundle: &NativeBundle) -> Result<()> {
        let probe = requirements_contain(
            context.runner.as_ref(),
            context.build_dir(),
            &context.env,
            bundle.markers,
        )
        .await;

        match probe {
            Probe::Absent => {
                debug!(dependency = bundle.dependency, "No marker listed, skipping");
                return Ok(());
            }
            Probe::Failed(err) => {
                return Err(err)
                    .with_context(|| format!("Could not check requirements for {}", bundle.dependency));
            }
            Probe::Present => {}
        }

        let install_dir = context.dep_dir().join(bundle.dependency);
        let dep = context
            .manifest
            .install_unversioned(bundle.dependency, &install_dir)
            .await
            .with_context(|| format!("Could not install {}", bundle.dependency))?;
        info!(version = %dep.version, "Installed {}", bundle.dependency);

        let location = install_dir.display().to_string();
        context.env.set(bundle.env_var, location.as_str());
        context.stager.write_env_file(bundle.env_var, &location)?;

        for (src, dest) in bundle.links {
            match context
                .stager
                .link_directory_in_dep_dir(&install_dir.join(src), dest)
            {
                Ok(()) => {}
                Err(StagerError::MissingSource(path)) => {
                    debug!(path = %path.display(), "Bundle has no such directory");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

#[async_trait]
impl SupplyStep for InstallNativeLibrariesStep {
    fn name(&self) -> &'static str {
        "InstallNativeLibraries"
    }

    async fn execute(&self, context: &mut SupplyContext) -> Result<()> {
        if !context.has_requirements() {
            warn!("No requirements.txt found, skipping native library checks");
            return Ok(());
        }

        for bundle in [MEMCACHED, FFI] {
            self.install(context, &bundle).await?;
        }
        Ok(())
    }
}
