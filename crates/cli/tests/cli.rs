//! Exit codes and error output of the supply and finalize executables.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const MANIFEST: &str = r#"---
language: python
default_versions:
  - name: python
    version: 3.6.x
dependencies:
  - name: python
    version: 3.6.4
    uri: https://buildpacks.example.invalid/python-3.6.4.tgz
    sha256: "0000000000000000000000000000000000000000000000000000000000000000"
"#;

struct Staging {
    temp: TempDir,
    build_dir: PathBuf,
}

impl Staging {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let build_dir = temp.path().join("build");
        for dir in ["build", "cache", "deps/0", "buildpack", "tmp", "empty-path"] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        fs::write(temp.path().join("buildpack/manifest.yml"), MANIFEST).unwrap();
        Self { temp, build_dir }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    fn write_app_file(&self, name: &str, content: &str) {
        fs::write(self.build_dir.join(name), content).unwrap();
    }

    fn command(&self, binary: &str) -> Command {
        let mut command = Command::new(binary);
        command
            .arg(&self.build_dir)
            .arg(self.path("cache"))
            .arg(self.path("deps"))
            .arg("0")
            .env("BUILDPACK_DIR", self.path("buildpack"))
            .env("TMPDIR", self.path("tmp"))
            .env("PATH", self.path("empty-path"))
            .env_remove("DISABLE_COLLECTSTATIC")
            .env_remove("CF_STACK")
            .env_remove("RUST_LOG")
            .env_remove("BP_DEBUG")
            .env_remove("PYBUILDPACK_LOG_JSON");
        command
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn run(command: &mut Command) -> Output {
    command.output().expect("Failed to execute binary")
}

fn supply_bin() -> &'static str {
    env!("CARGO_BIN_EXE_supply")
}

fn finalize_bin() -> &'static str {
    env!("CARGO_BIN_EXE_finalize")
}

#[test]
fn test_supply_help() {
    let output = run(Command::new(supply_bin()).arg("--help"));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("supply"));
    assert!(stdout.contains("BUILD_DIR"));
    assert!(stdout.contains("--log-level"));
}

#[test]
fn test_finalize_version() {
    let output = run(Command::new(finalize_bin()).arg("--version"));

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_arguments_fail() {
    let output = run(Command::new(supply_bin()).env_remove("RUST_LOG"));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("**ERROR** Missing required argument: build_dir"));
}

#[test]
fn test_missing_build_dir_fails_validation() {
    let staging = Staging::new();
    fs::remove_dir_all(&staging.build_dir).unwrap();

    let output = run(&mut staging.command(supply_bin()));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Build directory does not exist"));
}

#[test]
fn test_unsupported_runtime_fails_supply() {
    let staging = Staging::new();
    staging.write_app_file("runtime.txt", "python-9.9.9\n");

    let output = run(&mut staging.command(supply_bin()));

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("**ERROR**"));
    assert!(err.contains("Step InstallPython failed"));
    assert!(err.contains("python-9.9.9"));
    assert!(!staging.path("deps/0/python").exists());
}

#[test]
fn test_json_log_output() {
    let staging = Staging::new();
    staging.write_app_file("runtime.txt", "python-9.9.9\n");

    let output = run(staging.command(supply_bin()).env("PYBUILDPACK_LOG_JSON", "true"));

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("\"level\":\"INFO\""));
    assert!(err.contains("Supplying Python"));
}

#[test]
fn test_missing_manifest_fails_supply() {
    let staging = Staging::new();
    fs::remove_file(staging.path("buildpack/manifest.yml")).unwrap();

    let output = run(&mut staging.command(supply_bin()));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Could not load the buildpack manifest"));
}

#[test]
fn test_finalize_disabled_collectstatic_succeeds() {
    let staging = Staging::new();
    staging.write_app_file("requirements.txt", "Django\n");

    let output = run(staging.command(finalize_bin()).env("DISABLE_COLLECTSTATIC", "1"));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_finalize_without_requirements_succeeds() {
    let staging = Staging::new();

    let output = run(&mut staging.command(finalize_bin()));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_finalize_missing_requirements_tool_fails() {
    let staging = Staging::new();
    staging.write_app_file("requirements.txt", "Django\n");

    let output = run(&mut staging.command(finalize_bin()));

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Step CollectStatic failed"));
    assert!(err.contains("pip-grep"));
}

#[test]
fn test_finalize_accepts_profile_dir() {
    let staging = Staging::new();
    fs::create_dir_all(staging.path("profile")).unwrap();

    let output = run(staging
        .command(finalize_bin())
        .arg(staging.path("profile"))
        .arg("--quiet"));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).is_empty());
}
