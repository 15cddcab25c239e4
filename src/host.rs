//! Host environment requirement checks
//!
//! Verifies the machine can run the deployment at all:
//! - Linux on x86_64 (the vendor only builds the database image there)
//! - git installed (vendor tree clone)
//! - docker installed AND its daemon answering a liveness probe
//!
//! These are static environment facts; any failure is terminal for the run.

use std::path::Path;

use crate::exec;

/// Individual check item
#[derive(Debug, Clone)]
pub struct CheckItem {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub fix_hint: Option<String>,
}

/// Result of the host requirements check
#[derive(Debug, Clone)]
pub struct HostCheckResult {
    pub passed: bool,
    pub checks: Vec<CheckItem>,
}

impl HostCheckResult {
    /// Returns a formatted report naming every unmet condition, or `None`
    /// when all checks passed.
    pub fn error_message(&self) -> Option<String> {
        if self.passed {
            return None;
        }

        let failed: Vec<_> = self.checks.iter().filter(|c| !c.passed).collect();

        let mut msg = String::from(
            "\n╔════════════════════════════════════════════════════════════════╗\n\
             ║  Host Requirements Not Met                                     ║\n\
             ╚════════════════════════════════════════════════════════════════╝\n\n",
        );

        msg.push_str("The following requirements are not satisfied:\n\n");

        for (i, check) in failed.iter().enumerate() {
            msg.push_str(&format!("  {}. {} - {}\n", i + 1, check.name, check.message));
            if let Some(fix) = &check.fix_hint {
                msg.push_str(&format!("     Fix: {}\n", fix));
            }
            msg.push('\n');
        }

        Some(msg)
    }
}

/// Check all host requirements for the setup flow.
pub async fn check_host_requirements(work_dir: &Path) -> HostCheckResult {
    let checks = vec![
        check_platform(),
        check_architecture(),
        check_tool("git", work_dir, "install git (e.g. apt install git)").await,
        check_tool(
            "docker",
            work_dir,
            "install Docker Engine: https://docs.docker.com/engine/install/",
        )
        .await,
        check_docker_daemon(work_dir).await,
    ];

    let passed = checks.iter().all(|c| c.passed);

    if passed {
        tracing::info!("[HostCheck] All host requirements satisfied");
    }

    HostCheckResult { passed, checks }
}

fn check_platform() -> CheckItem {
    let os = std::env::consts::OS;
    CheckItem {
        name: "Operating system".to_string(),
        passed: os == "linux",
        message: if os == "linux" {
            "Linux detected".to_string()
        } else {
            format!("running on '{}', but the vendor images require Linux", os)
        },
        fix_hint: None,
    }
}

fn check_architecture() -> CheckItem {
    let arch = std::env::consts::ARCH;
    CheckItem {
        name: "CPU architecture".to_string(),
        passed: arch == "x86_64",
        message: if arch == "x86_64" {
            "x86_64 detected".to_string()
        } else {
            format!("running on '{}', but the database image only builds on x86_64", arch)
        },
        fix_hint: None,
    }
}

/// Probe a tool by running `<tool> --version`; binary presence alone is not
/// enough to know it is runnable.
async fn check_tool(tool: &str, work_dir: &Path, fix: &str) -> CheckItem {
    let passed = matches!(
        exec::run_capture(tool, &["--version"], work_dir).await,
        Ok(output) if output.status.success()
    );
    CheckItem {
        name: format!("{} installed", tool),
        passed,
        message: if passed {
            format!("{} is available", tool)
        } else {
            format!("{} is not installed or not on PATH", tool)
        },
        fix_hint: if passed { None } else { Some(fix.to_string()) },
    }
}

/// Liveness probe against the docker daemon, not just the client binary.
async fn check_docker_daemon(work_dir: &Path) -> CheckItem {
    let passed = matches!(
        exec::run_capture("docker", &["info"], work_dir).await,
        Ok(output) if output.status.success()
    );
    CheckItem {
        name: "Docker daemon reachable".to_string(),
        passed,
        message: if passed {
            "daemon answered `docker info`".to_string()
        } else {
            "`docker info` failed; the daemon is not running or the user lacks access".to_string()
        },
        fix_hint: if passed {
            None
        } else {
            Some("start the daemon (systemctl start docker) and ensure your user is in the docker group".to_string())
        },
    }
}
