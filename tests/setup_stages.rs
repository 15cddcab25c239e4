//! Stage-level tests for the setup flow, driven by stub `git`/`docker`
//! executables on a scoped PATH. Each stub records its invocations to a log
//! file in the working-directory root so the tests can assert exactly which
//! external effects a stage produced.

use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tempfile::TempDir;

use oractl::{
    image, launch, lifecycle, vendor, ComposeCommand, ComposeForm, LifecycleVerb, OperatorPrompt,
    Settings, SetupError, SetupOptions, Workspace,
};

// PATH is process-global; serialize every test that swaps it.
static ENV_LOCK: Mutex<()> = Mutex::new(());

struct PathGuard {
    _lock: MutexGuard<'static, ()>,
    saved: OsString,
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        std::env::set_var("PATH", &self.saved);
    }
}

/// Prepend `dir` to PATH (or replace PATH entirely) for the guard's lifetime.
fn scoped_path(dir: &Path, replace: bool) -> PathGuard {
    let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let saved = std::env::var_os("PATH").unwrap_or_default();
    let new = if replace {
        dir.as_os_str().to_owned()
    } else {
        let mut joined = dir.as_os_str().to_owned();
        joined.push(":");
        joined.push(&saved);
        joined
    };
    std::env::set_var("PATH", &new);
    PathGuard { _lock: lock, saved }
}

fn write_stub(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
}

fn read_log(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

/// Prompt double that must never be consulted.
struct UnexpectedPrompt;

#[async_trait]
impl OperatorPrompt for UnexpectedPrompt {
    async fn acknowledge(&mut self, _instructions: &str) -> Result<(), SetupError> {
        panic!("operator prompt consulted in a flow that should be non-interactive");
    }
}

#[tokio::test]
async fn fresh_host_clones_exactly_once_then_reruns_offline() {
    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_stub(
        stubs.path(),
        "git",
        "echo \"$@\" >> git-invocations.log\nmkdir -p docker-images",
    );
    let _path = scoped_path(stubs.path(), false);

    let ws = Workspace::locate(root.path().to_path_buf(), Settings::default());

    vendor::ensure_vendor_tree(&ws).await.unwrap();
    let log = read_log(&ws.root.join("git-invocations.log"));
    assert_eq!(
        log.trim(),
        "clone https://github.com/oracle/docker-images.git"
    );

    // Tree present: the re-run makes no network call at all.
    vendor::ensure_vendor_tree(&ws).await.unwrap();
    let log = read_log(&ws.root.join("git-invocations.log"));
    assert_eq!(log.trim().lines().count(), 1);
}

#[tokio::test]
async fn failed_clone_is_fatal_and_leaves_partial_tree() {
    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_stub(stubs.path(), "git", "mkdir -p docker-images/partial\nexit 128");
    let _path = scoped_path(stubs.path(), false);

    let ws = Workspace::locate(root.path().to_path_buf(), Settings::default());

    // The vendor dir must not pre-exist or the clone would be skipped.
    // The stub simulates a clone dying partway through.
    fs::remove_dir_all(ws.vendor_root()).ok();
    let result = vendor::ensure_vendor_tree(&ws).await;
    assert!(matches!(result, Err(SetupError::CloneFailed { .. })));
    // Half-cloned tree left for inspection, not auto-cleaned.
    assert!(ws.vendor_root().join("partial").is_dir());
}

#[tokio::test]
async fn compose_detection_prefers_the_plugin_form() {
    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_stub(
        stubs.path(),
        "docker",
        "[ \"$1\" = \"compose\" ] && exit 0\nexit 1",
    );
    let _path = scoped_path(stubs.path(), false);

    let compose = ComposeCommand::detect(root.path()).await.unwrap();
    assert_eq!(compose.form(), ComposeForm::Plugin);
}

#[tokio::test]
async fn compose_detection_falls_back_to_standalone() {
    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_stub(stubs.path(), "docker", "exit 1");
    write_stub(stubs.path(), "docker-compose", "exit 0");
    let _path = scoped_path(stubs.path(), true);

    let compose = ComposeCommand::detect(root.path()).await.unwrap();
    assert_eq!(compose.form(), ComposeForm::Standalone);
}

#[tokio::test]
async fn compose_detection_without_either_form_is_an_error() {
    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_stub(stubs.path(), "docker", "exit 1");
    let _path = scoped_path(stubs.path(), true);

    let result = ComposeCommand::detect(root.path()).await;
    assert!(matches!(result, Err(SetupError::ComposeNotFound)));
}

/// Build a workspace with a fake vendor tree whose build entrypoint records
/// its invocation and carries the shipped disk-space line.
fn vendor_tree_with_build_script(root: &Path) -> Workspace {
    let ws = Workspace::locate(root.to_path_buf(), Settings::default());
    fs::create_dir_all(ws.version_dir()).unwrap();
    write_stub(
        &ws.dockerfiles_dir(),
        "buildContainerImage.sh",
        "echo \"$@\" >> build-invocations.log\n# REQUIRED_SPACE_GB=18",
    );
    ws
}

#[tokio::test]
async fn absent_image_is_built_after_patching_the_space_check() {
    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    // `docker images -q` prints nothing: image absent.
    write_stub(stubs.path(), "docker", "exit 0");
    let _path = scoped_path(stubs.path(), false);

    let ws = vendor_tree_with_build_script(root.path());
    image::ensure_image(&ws).await.unwrap();

    let script = fs::read_to_string(ws.build_script()).unwrap();
    assert!(script.contains("REQUIRED_SPACE_GB=12"));
    assert!(!script.contains("REQUIRED_SPACE_GB=18"));

    let log = read_log(&ws.dockerfiles_dir().join("build-invocations.log"));
    assert_eq!(log.trim(), "-v 19.3.0 -e");
}

#[tokio::test]
async fn present_image_short_circuits_the_build() {
    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_stub(
        stubs.path(),
        "docker",
        "if [ \"$1\" = \"images\" ]; then echo abc123; fi\nexit 0",
    );
    let _path = scoped_path(stubs.path(), false);

    // No vendor tree and no build script: reaching the build would fail, so
    // a clean return proves the short-circuit.
    let ws = Workspace::locate(root.path().to_path_buf(), Settings::default());
    image::ensure_image(&ws).await.unwrap();
}

#[tokio::test]
async fn clean_brings_the_deployment_down_and_removes_the_image() {
    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_stub(
        stubs.path(),
        "docker",
        "echo \"$@\" >> docker-invocations.log\nif [ \"$1\" = \"images\" ]; then echo abc123; fi\nexit 0",
    );
    let _path = scoped_path(stubs.path(), false);

    let ws = Workspace::locate(root.path().to_path_buf(), Settings::default());
    fs::write(ws.compose_file(), b"services: {}\n").unwrap();

    let compose = ComposeCommand::detect(&ws.root).await.unwrap();
    image::clean(&ws, &compose).await.unwrap();

    let log = read_log(&ws.root.join("docker-invocations.log"));
    assert!(log.contains("compose down"));
    assert!(log.contains("rmi -f oracle/database:19.3.0-ee"));
}

#[tokio::test]
async fn launch_rebuilds_monitoring_before_the_full_service_set() {
    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_stub(
        stubs.path(),
        "docker",
        "echo \"$@\" >> docker-invocations.log\nexit 0",
    );
    let _path = scoped_path(stubs.path(), false);

    let ws = Workspace::locate(root.path().to_path_buf(), Settings::default());
    fs::write(ws.compose_file(), b"services: {}\n").unwrap();
    fs::write(ws.env_file(), b"DB1_PORT=1521\n").unwrap();

    let compose = ComposeCommand::detect(&ws.root).await.unwrap();
    launch::bring_up(&ws, &compose).await.unwrap();

    let log = read_log(&ws.root.join("docker-invocations.log"));
    let monitoring_phase = log
        .lines()
        .position(|l| l == "compose up -d --build monitoring")
        .expect("monitoring phase missing");
    let full_phase = log
        .lines()
        .position(|l| l == "compose up -d")
        .expect("full bring-up missing");
    assert!(monitoring_phase < full_phase);
}

#[tokio::test]
async fn start_without_containers_is_an_advisory_not_a_crash() {
    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_stub(
        stubs.path(),
        "docker",
        "if [ \"$1 $2\" = \"compose start\" ]; then exit 1; fi\nexit 0",
    );
    let _path = scoped_path(stubs.path(), false);

    let ws = Workspace::locate(root.path().to_path_buf(), Settings::default());
    let compose = ComposeCommand::detect(&ws.root).await.unwrap();
    lifecycle::dispatch(LifecycleVerb::Start, &ws, &compose)
        .await
        .unwrap();
}

#[tokio::test]
async fn rerun_with_everything_present_is_fully_idempotent() {
    // The host gate legitimately refuses other platforms; this flow-level
    // test only makes sense where the gate passes.
    if std::env::consts::OS != "linux" || std::env::consts::ARCH != "x86_64" {
        return;
    }

    let stubs = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_stub(
        stubs.path(),
        "git",
        "echo \"$@\" >> git-invocations.log\nexit 0",
    );
    write_stub(
        stubs.path(),
        "docker",
        "echo \"$@\" >> docker-invocations.log\nif [ \"$1\" = \"images\" ]; then echo abc123; fi\nexit 0",
    );
    let _path = scoped_path(stubs.path(), true);

    let ws = Workspace::locate(root.path().to_path_buf(), Settings::default());
    fs::create_dir_all(ws.version_dir()).unwrap();
    fs::write(ws.artifact_primary(), b"zip").unwrap();
    fs::write(ws.compose_file(), b"services: {}\n").unwrap();
    fs::write(ws.env_file(), b"DB1_PORT=1521\n").unwrap();

    let mut prompt = UnexpectedPrompt;
    oractl::run_setup(
        ws.root.clone(),
        Settings::default(),
        SetupOptions::default(),
        &mut prompt,
    )
    .await
    .unwrap();

    // Zero network calls: git was only consulted for its version.
    let git_log = read_log(&ws.root.join("git-invocations.log"));
    assert!(!git_log.contains("clone"));

    // Zero builds, zero image removals; the deployment is still brought up.
    let docker_log = read_log(&ws.root.join("docker-invocations.log"));
    assert!(!docker_log.contains("rmi"));
    assert!(docker_log.contains("compose up -d --build monitoring"));
    assert!(docker_log.contains("compose up -d"));
    assert!(!ws.dockerfiles_dir().join("build-invocations.log").exists());

    // Zero file copies: the fallback location stays empty.
    assert!(!ws.artifact_fallback().exists());
}
