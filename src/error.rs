//! Setup-flow error types
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    /// Host environment requirements not met (wrong OS, missing tools, dead daemon).
    /// Carries the fully rendered check report.
    #[error("{0}")]
    Environment(String),

    #[error("no container orchestrator found: need `docker compose` or `docker-compose` on PATH")]
    ComposeNotFound,

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed ({status})")]
    CommandFailed { program: String, status: ExitStatus },

    #[error("clone of {url} failed ({status}); any partial checkout is left in place for inspection")]
    CloneFailed { url: String, status: ExitStatus },

    #[error("installation artifact {name} not found at {primary:?} or {fallback:?}")]
    ArtifactMissing {
        name: String,
        primary: PathBuf,
        fallback: PathBuf,
    },

    #[error("failed to copy {from:?} to {to:?}: {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image build failed for {image} ({status})")]
    BuildFailed { image: String, status: ExitStatus },

    /// Terminal gate of the setup flow: descriptor or config file absent.
    #[error("cannot launch deployment: {0:?} not found")]
    MissingDeploymentFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
