//! Vendor tree and installation artifact acquisition
//!
//! Two independent idempotent steps: clone-once of the vendor source tree,
//! and presence of the proprietary installation archive at the build-required
//! location. The artifact step is the only interactive point in the whole
//! system: when the archive is nowhere to be found, the flow suspends until
//! the operator confirms they have supplied it.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::SetupError;
use crate::exec;
use crate::workdir::Workspace;

/// The single interactive suspension point of the setup flow.
///
/// `acknowledge` blocks until the operator signals they have acted on the
/// printed instructions. There is deliberately no timeout.
#[async_trait]
pub trait OperatorPrompt: Send {
    async fn acknowledge(&mut self, instructions: &str) -> Result<(), SetupError>;
}

/// Prompt backed by the operator's terminal: print instructions, wait for a
/// line on stdin.
pub struct StdinPrompt;

#[async_trait]
impl OperatorPrompt for StdinPrompt {
    async fn acknowledge(&mut self, instructions: &str) -> Result<(), SetupError> {
        eprintln!("{}", instructions);
        eprintln!("Press Enter to continue once the file is in place...");
        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        stdin.read_line(&mut line).await?;
        Ok(())
    }
}

/// Ensure the vendor source tree is present, cloning it at most once.
///
/// An existing tree is trusted as-is so re-runs stay offline. A failed clone
/// is fatal and any partial checkout is left in place for manual inspection.
pub async fn ensure_vendor_tree(ws: &Workspace) -> Result<(), SetupError> {
    let vendor_root = ws.vendor_root();
    if vendor_root.is_dir() {
        tracing::info!(
            "[Vendor] Source tree already present at {:?}, skipping clone",
            vendor_root
        );
        return Ok(());
    }

    let url = &ws.settings.vendor_url;
    tracing::info!("[Vendor] Cloning {} into {:?}", url, vendor_root);
    let status = exec::run_streaming("git", &["clone", url], &ws.root).await?;
    if !status.success() {
        return Err(SetupError::CloneFailed {
            url: url.clone(),
            status,
        });
    }
    Ok(())
}

/// Ensure the installation artifact sits at the build-required path.
///
/// Check order: build-required path first, working-directory fallback second.
/// Absent from both, print acquisition instructions and suspend on the
/// operator prompt; after resuming, re-check both locations once. Found only
/// at the fallback, copy (never move) into place.
pub async fn ensure_install_artifact(
    ws: &Workspace,
    prompt: &mut dyn OperatorPrompt,
) -> Result<(), SetupError> {
    let primary = ws.artifact_primary();
    let fallback = ws.artifact_fallback();

    if primary.is_file() {
        tracing::info!("[Vendor] Installation artifact already at {:?}", primary);
        return Ok(());
    }

    if !fallback.is_file() {
        prompt.acknowledge(&artifact_instructions(ws)).await?;

        // Single interactive retry: re-derive both locations from disk.
        if primary.is_file() {
            tracing::info!("[Vendor] Installation artifact now at {:?}", primary);
            return Ok(());
        }
        if !fallback.is_file() {
            return Err(SetupError::ArtifactMissing {
                name: ws.settings.artifact_name.clone(),
                primary,
                fallback,
            });
        }
    }

    tracing::info!("[Vendor] Copying {:?} to {:?}", fallback, primary);
    tokio::fs::copy(&fallback, &primary)
        .await
        .map_err(|e| SetupError::CopyFailed {
            from: fallback,
            to: primary,
            source: e,
        })?;
    Ok(())
}

/// Operator-facing instructions for obtaining the artifact: where to get it,
/// the exact required filename, and both acceptable drop locations.
pub fn artifact_instructions(ws: &Workspace) -> String {
    format!(
        "\nThe Oracle installation archive is required to build the database image\n\
         but was not found. It is not redistributable and must be downloaded\n\
         manually (an Oracle account is required):\n\n\
         \x20 {url}\n\n\
         Download exactly this file:\n\n\
         \x20 {name}\n\n\
         and place it in one of:\n\n\
         \x20 {primary:?}\n\
         \x20 {fallback:?}\n",
        url = ws.settings.artifact_source_url,
        name = ws.settings.artifact_name,
        primary = ws.artifact_primary(),
        fallback = ws.artifact_fallback(),
    )
}
