//! Compose command detection and construction
//!
//! Two equivalent invocation forms exist in the wild: the `docker compose`
//! plugin and the standalone `docker-compose` binary. The form is resolved
//! once at startup and the handle is read-only thereafter.

use std::path::Path;

use crate::error::SetupError;
use crate::exec;

/// Which compose invocation form the host provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeForm {
    /// `docker compose ...` (plugin, preferred)
    Plugin,
    /// `docker-compose ...` (standalone binary)
    Standalone,
}

/// Resolved orchestrator invocation handle.
#[derive(Debug, Clone, Copy)]
pub struct ComposeCommand {
    form: ComposeForm,
}

impl ComposeCommand {
    /// Detect the available compose form, preferring the plugin.
    pub async fn detect(work_dir: &Path) -> Result<Self, SetupError> {
        if probe(["docker", "compose", "version"], work_dir).await {
            tracing::info!("[Compose] Using `docker compose` (plugin)");
            return Ok(Self {
                form: ComposeForm::Plugin,
            });
        }
        if probe(["docker-compose", "version"], work_dir).await {
            tracing::info!("[Compose] Using `docker-compose` (standalone)");
            return Ok(Self {
                form: ComposeForm::Standalone,
            });
        }
        Err(SetupError::ComposeNotFound)
    }

    pub fn form(&self) -> ComposeForm {
        self.form
    }

    pub fn program(&self) -> &'static str {
        match self.form {
            ComposeForm::Plugin => "docker",
            ComposeForm::Standalone => "docker-compose",
        }
    }

    /// Full argument vector for a compose verb, in the resolved form.
    pub fn args<'a>(&self, verb: &[&'a str]) -> Vec<&'a str> {
        match self.form {
            ComposeForm::Plugin => {
                let mut args = vec!["compose"];
                args.extend_from_slice(verb);
                args
            }
            ComposeForm::Standalone => verb.to_vec(),
        }
    }

    /// Run a compose verb with inherited stdio and require success.
    pub async fn run_checked(&self, verb: &[&str], work_dir: &Path) -> Result<(), SetupError> {
        exec::run_checked(self.program(), &self.args(verb), work_dir).await
    }

    /// Run a compose verb with inherited stdio, returning the raw status.
    pub async fn run_streaming(
        &self,
        verb: &[&str],
        work_dir: &Path,
    ) -> Result<std::process::ExitStatus, SetupError> {
        exec::run_streaming(self.program(), &self.args(verb), work_dir).await
    }
}

/// Handle construction for unit tests that never reach a real orchestrator.
#[cfg(test)]
pub fn test_handle() -> ComposeCommand {
    ComposeCommand {
        form: ComposeForm::Plugin,
    }
}

async fn probe<const N: usize>(invocation: [&str; N], work_dir: &Path) -> bool {
    matches!(
        exec::run_capture(invocation[0], &invocation[1..], work_dir).await,
        Ok(output) if output.status.success()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_form_prepends_compose() {
        let cmd = ComposeCommand {
            form: ComposeForm::Plugin,
        };
        assert_eq!(cmd.program(), "docker");
        assert_eq!(cmd.args(&["up", "-d"]), vec!["compose", "up", "-d"]);
    }

    #[test]
    fn standalone_form_passes_verb_through() {
        let cmd = ComposeCommand {
            form: ComposeForm::Standalone,
        };
        assert_eq!(cmd.program(), "docker-compose");
        assert_eq!(cmd.args(&["logs", "-f"]), vec!["logs", "-f"]);
    }
}
