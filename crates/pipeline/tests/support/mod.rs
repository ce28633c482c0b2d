#![allow(dead_code)]

use pybuildpack_core::{BuildEnv, MockCommandRunner, MockManifest, MockStager};
use pybuildpack_pipeline::SupplyContext;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

pub const INHERITED_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route this thread's log output into a buffer until the guard drops.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

pub fn standard_manifest() -> MockManifest {
    MockManifest::new()
        .with_versions("python", &["2.7.14", "3.4.2", "3.6.3", "3.6.4"])
        .with_default("python", "3.6.4")
        .with_versions("setuptools", &["39.0.1"])
        .with_versions("pip", &["9.0.3"])
        .with_versions("pip-pop", &["0.1.1"])
        .with_versions("libmemcache", &["1.0.18"])
        .with_versions("libffi", &["3.2.1"])
}

pub struct StagingDirs {
    pub temp: TempDir,
    pub build_dir: PathBuf,
    pub deps_dir: PathBuf,
    pub tmp_dir: PathBuf,
}

impl StagingDirs {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let build_dir = temp.path().join("build");
        let deps_dir = temp.path().join("deps");
        let tmp_dir = temp.path().join("tmp");
        for dir in [&build_dir, &deps_dir, &tmp_dir] {
            fs::create_dir_all(dir).unwrap();
        }
        Self {
            temp,
            build_dir,
            deps_dir,
            tmp_dir,
        }
    }

    pub fn dep_dir(&self) -> PathBuf {
        self.deps_dir.join("0")
    }

    pub fn write_app_file(&self, name: &str, content: &str) {
        let path = self.build_dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// What a python install leaves behind for the link and rewrite steps.
    pub fn fake_python_install(&self) {
        let python = self.dep_dir().join("python");
        for dir in ["bin", "lib/pkgconfig", "include"] {
            fs::create_dir_all(python.join(dir)).unwrap();
        }
        fs::write(
            python.join("bin/pip"),
            format!("#!{}/bin/python\nimport pip\n", python.display()),
        )
        .unwrap();
    }
}

pub struct SupplyFixture {
    pub dirs: StagingDirs,
    pub stager: Arc<MockStager>,
    pub manifest: Arc<MockManifest>,
    pub runner: Arc<MockCommandRunner>,
}

impl SupplyFixture {
    pub fn new() -> Self {
        Self::with_manifest(standard_manifest())
    }

    pub fn with_manifest(manifest: MockManifest) -> Self {
        let dirs = StagingDirs::new();
        dirs.fake_python_install();
        let stager = Arc::new(MockStager::new(&dirs.build_dir, &dirs.deps_dir, "0"));
        Self {
            dirs,
            stager,
            manifest: Arc::new(manifest),
            runner: Arc::new(MockCommandRunner::new()),
        }
    }

    pub fn context(&self) -> SupplyContext {
        SupplyContext::new(
            self.stager.clone(),
            self.manifest.clone(),
            self.runner.clone(),
            BuildEnv::inherit([("PATH", INHERITED_PATH)]),
            &self.dirs.tmp_dir,
        )
    }

    pub fn dep_path(&self, relative: &str) -> PathBuf {
        self.dirs.dep_dir().join(relative)
    }
}

pub fn path_str(path: &Path) -> String {
    path.display().to_string()
}
