//! The staged setup flow
//!
//! Stage order is load-bearing: config resolution, host gating, vendor/
//! artifact acquisition, conditional image build, deployment launch. Each
//! stage is a hard precondition for the next and every check is re-derived
//! from the filesystem or the container runtime, so a failed run is resumed
//! by simply running `setup` again.

use std::path::PathBuf;

use crate::compose::ComposeCommand;
use crate::error::SetupError;
use crate::settings::Settings;
use crate::vendor::OperatorPrompt;
use crate::workdir::Workspace;
use crate::{host, image, launch, vendor};

/// Options for a setup run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetupOptions {
    /// Remove existing containers and the image before building.
    pub clean: bool,
}

/// Run the full setup flow from `start_dir`.
pub async fn run_setup(
    start_dir: PathBuf,
    settings: Settings,
    opts: SetupOptions,
    prompt: &mut dyn OperatorPrompt,
) -> Result<(), SetupError> {
    let ws = Workspace::resolve(start_dir, settings)?;
    tracing::info!("[Setup] Working directory: {:?}", ws.root);

    let host_check = host::check_host_requirements(&ws.root).await;
    if let Some(report) = host_check.error_message() {
        return Err(SetupError::Environment(report));
    }

    let compose = ComposeCommand::detect(&ws.root).await?;

    vendor::ensure_vendor_tree(&ws).await?;
    vendor::ensure_install_artifact(&ws, prompt).await?;

    if opts.clean {
        image::clean(&ws, &compose).await?;
    }

    image::ensure_image(&ws).await?;

    launch::bring_up(&ws, &compose).await?;

    tracing::info!("[Setup] Deployment is up; `oractl status` shows container state");
    Ok(())
}
