mod support;

use pybuildpack_core::{
    BuildEnv, DirStager, EntryPointFinder, ManagePyFinder, MockCommandRunner, MockEntryPointFinder,
    MockStager,
};
use pybuildpack_pipeline::{FinalizeContext, FinalizeOrchestrator};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use support::*;

const COLLECTSTATIC: &str = "python /foo/bar/manage.py collectstatic --noinput --traceback";

struct FinalizeFixture {
    dirs: StagingDirs,
    runner: Arc<MockCommandRunner>,
    finder: Arc<MockEntryPointFinder>,
}

impl FinalizeFixture {
    fn new() -> Self {
        Self::with_finder(MockEntryPointFinder::returning("/foo/bar/manage.py"))
    }

    fn with_finder(finder: MockEntryPointFinder) -> Self {
        Self {
            dirs: StagingDirs::new(),
            runner: Arc::new(MockCommandRunner::new()),
            finder: Arc::new(finder),
        }
    }

    fn context(&self, collectstatic_disabled: bool) -> FinalizeContext {
        let stager = Arc::new(MockStager::new(&self.dirs.build_dir, &self.dirs.deps_dir, "0"));
        FinalizeContext::from_dep_dir(
            stager,
            self.runner.clone(),
            self.finder.clone(),
            BuildEnv::inherit([("PATH", INHERITED_PATH)]),
            collectstatic_disabled,
        )
        .unwrap()
    }

    async fn run(&self, collectstatic_disabled: bool) -> anyhow::Result<()> {
        let mut context = self.context(collectstatic_disabled);
        FinalizeOrchestrator::new().execute(&mut context).await
    }
}

#[tokio::test]
async fn test_disabled_makes_no_calls() {
    let fixture = FinalizeFixture::new();
    fixture.dirs.write_app_file("requirements.txt", "Django==1.11\n");

    fixture.run(true).await.unwrap();

    assert_eq!(fixture.runner.call_count(), 0);
    assert!(fixture.finder.lookups().is_empty());
}

#[tokio::test]
async fn test_django_runs_collectstatic_with_found_manage_py() {
    let fixture = FinalizeFixture::new();
    fixture.dirs.write_app_file("requirements.txt", "django\n");

    fixture.run(false).await.unwrap();

    assert_eq!(fixture.finder.lookups(), vec![fixture.dirs.build_dir.clone()]);
    assert_eq!(
        fixture.runner.command_lines(),
        vec![
            "pip-grep -s requirements.txt django Django".to_string(),
            COLLECTSTATIC.to_string(),
        ]
    );
    let call = fixture.runner.find("python").unwrap();
    assert_eq!(call.invocation.dir, fixture.dirs.build_dir);
}

#[tokio::test]
async fn test_no_framework_marker_skips() {
    let fixture = FinalizeFixture::new();
    fixture.dirs.write_app_file("requirements.txt", "flask\n");
    fixture.runner.fail_with("pip-grep", 1, "");

    fixture.run(false).await.unwrap();

    assert!(fixture.finder.lookups().is_empty());
    assert!(fixture.runner.find("python").is_none());
}

#[tokio::test]
async fn test_missing_requirements_skips() {
    let fixture = FinalizeFixture::new();

    fixture.run(false).await.unwrap();

    assert_eq!(fixture.runner.call_count(), 0);
    assert!(fixture.finder.lookups().is_empty());
}

#[tokio::test]
async fn test_broken_requirements_check_is_fatal() {
    let fixture = FinalizeFixture::new();
    fixture.dirs.write_app_file("requirements.txt", "django\n");
    fixture.runner.fail_to_spawn("pip-grep");

    let err = fixture.run(false).await.unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("Step CollectStatic failed"));
    assert!(message.contains("Could not check requirements for Django"));
    assert!(fixture.finder.lookups().is_empty());
}

#[tokio::test]
async fn test_collectstatic_failure_logs_remediation() {
    let fixture = FinalizeFixture::new();
    fixture.dirs.write_app_file("requirements.txt", "django\n");
    fixture.runner.fail_with("python", 1, "");
    let (logs, _guard) = capture_logs();

    let err = fixture.run(false).await.unwrap_err();

    assert!(format!("{:#}", err).contains("collectstatic failed"));
    let output = logs.contents();
    assert!(output.contains(
        " !     Error while running '$ python /foo/bar/manage.py collectstatic --noinput'."
    ));
    assert!(output.contains("$ cf set-env <app> DISABLE_COLLECTSTATIC 1"));
    assert!(output.contains("https://devcenter.heroku.com/articles/django-assets"));
}

#[tokio::test]
async fn test_missing_manage_py_is_fatal() {
    let fixture = FinalizeFixture::with_finder(MockEntryPointFinder::not_found());
    fixture.dirs.write_app_file("requirements.txt", "django\n");

    let err = fixture.run(false).await.unwrap_err();

    assert!(format!("{:#}", err).contains("no manage.py found"));
    assert!(fixture.runner.find("python").is_none());
}

#[tokio::test]
async fn test_environment_comes_from_dep_dir() {
    let fixture = FinalizeFixture::new();
    fixture.dirs.write_app_file("requirements.txt", "django\n");
    let env_dir = fixture.dirs.dep_dir().join("env");
    fs::create_dir_all(&env_dir).unwrap();
    fs::write(env_dir.join("PYTHONHOME"), "/deps/0/python").unwrap();
    fs::write(env_dir.join("LIBFFI"), "/deps/0/libffi").unwrap();

    fixture.run(false).await.unwrap();

    let call = fixture.runner.find("python").unwrap();
    let expected_path = format!("{}/bin:{}", path_str(&fixture.dirs.dep_dir()), INHERITED_PATH);
    assert_eq!(call.invocation.env_var("PATH"), Some(expected_path.as_str()));
    assert_eq!(call.invocation.env_var("PYTHONHOME"), Some("/deps/0/python"));
    assert_eq!(call.invocation.env_var("LIBFFI"), Some("/deps/0/libffi"));

    let check = fixture.runner.find("pip-grep").unwrap();
    assert_eq!(check.invocation.env_var("PATH"), Some(expected_path.as_str()));
}

#[tokio::test]
async fn test_finalize_with_real_finder() {
    let dirs = StagingDirs::new();
    dirs.write_app_file("requirements.txt", "Django>=1.11\n");
    dirs.write_app_file("mysite/manage.py", "import django\n");
    dirs.write_app_file("mysite/blog/manage.py", "import django\n");

    let finder = ManagePyFinder::new();
    let expected = dirs.build_dir.join("mysite").join("manage.py");
    assert_eq!(finder.find_management_entry_point(&dirs.build_dir).unwrap(), expected);

    let runner = Arc::new(MockCommandRunner::new());
    let mut context = FinalizeContext::from_dep_dir(
        Arc::new(DirStager::new(&dirs.build_dir, &dirs.deps_dir, "0")),
        runner.clone(),
        Arc::new(finder),
        BuildEnv::new(),
        false,
    )
    .unwrap();

    FinalizeOrchestrator::new().execute(&mut context).await.unwrap();

    let collect = runner.find("python").unwrap();
    assert_eq!(
        collect.invocation.args,
        vec![
            path_str(&expected),
            "collectstatic".to_string(),
            "--noinput".to_string(),
            "--traceback".to_string(),
        ]
    );
    assert!(Path::new(&collect.invocation.args[0]).is_file());
}
