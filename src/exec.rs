//! Subprocess execution helpers
//!
//! Every external tool (git, docker, the vendor build script) is invoked as a
//! synchronous child process; the exit status is the only success signal this
//! crate consumes.

use std::path::Path;
use std::process::{ExitStatus, Output};
use tokio::process::Command;

use crate::error::SetupError;

/// Run a command with stdio inherited from the operator's terminal.
///
/// Used for long-running, progress-emitting invocations (clone, build,
/// compose up/logs) where the operator should see the tool's own output live.
pub async fn run_streaming(
    program: &str,
    args: &[&str],
    work_dir: &Path,
) -> Result<ExitStatus, SetupError> {
    tracing::debug!("[Exec] {} {:?} (in {:?})", program, args, work_dir);

    Command::new(program)
        .args(args)
        .current_dir(work_dir)
        .status()
        .await
        .map_err(|e| SetupError::Spawn {
            program: program.to_string(),
            source: e,
        })
}

/// Run a command and capture its output, for query-style invocations
/// (`docker images -q`, liveness probes) whose stdout we inspect or discard.
pub async fn run_capture(
    program: &str,
    args: &[&str],
    work_dir: &Path,
) -> Result<Output, SetupError> {
    tracing::debug!("[Exec] {} {:?} (in {:?}, captured)", program, args, work_dir);

    Command::new(program)
        .args(args)
        .current_dir(work_dir)
        .output()
        .await
        .map_err(|e| SetupError::Spawn {
            program: program.to_string(),
            source: e,
        })
}

/// Run a streaming command and require a zero exit status.
pub async fn run_checked(program: &str, args: &[&str], work_dir: &Path) -> Result<(), SetupError> {
    let status = run_streaming(program, args, work_dir).await?;
    if !status.success() {
        return Err(SetupError::CommandFailed {
            program: program.to_string(),
            status,
        });
    }
    Ok(())
}
