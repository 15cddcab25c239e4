//! Database image build orchestration
//!
//! The image itself is produced by the vendor's build entrypoint; this module
//! only decides whether to invoke it, patches the vendor's disk-space
//! precondition first, and tears existing state down for `--clean` runs.

use crate::compose::ComposeCommand;
use crate::error::SetupError;
use crate::exec;
use crate::workdir::Workspace;

/// Shipped value of the vendor's disk-space precondition.
const SPACE_LINE_SHIPPED: &str = "REQUIRED_SPACE_GB=18";
/// Value this deployment can actually satisfy.
const SPACE_LINE_PATCHED: &str = "REQUIRED_SPACE_GB=12";

/// Outcome of the disk-space precondition patch.
#[derive(Debug, PartialEq, Eq)]
pub enum SpacePatch {
    /// The shipped line was found and replaced; carries the new script text.
    Applied(String),
    /// The script already carries the lowered value.
    AlreadyApplied,
    /// Neither value was found; the vendor changed the script.
    LineNotFound,
}

/// Exact-substring substitution of the disk-space requirement.
///
/// Running it twice is stable: the second pass sees the lowered value and
/// reports `AlreadyApplied` without touching the text.
pub fn apply_space_patch(script: &str) -> SpacePatch {
    if script.contains(SPACE_LINE_SHIPPED) {
        SpacePatch::Applied(script.replace(SPACE_LINE_SHIPPED, SPACE_LINE_PATCHED))
    } else if script.contains(SPACE_LINE_PATCHED) {
        SpacePatch::AlreadyApplied
    } else {
        SpacePatch::LineNotFound
    }
}

/// Patch the build script in place, lowering the disk-space requirement.
pub async fn patch_space_check(ws: &Workspace) -> Result<(), SetupError> {
    let script_path = ws.build_script();
    let script = tokio::fs::read_to_string(&script_path).await?;

    match apply_space_patch(&script) {
        SpacePatch::Applied(patched) => {
            tokio::fs::write(&script_path, patched).await?;
            tracing::info!(
                "[ImageBuilder] Lowered disk-space requirement to {} in {:?}",
                SPACE_LINE_PATCHED,
                script_path
            );
        }
        SpacePatch::AlreadyApplied => {
            tracing::info!("[ImageBuilder] Disk-space requirement already lowered");
        }
        SpacePatch::LineNotFound => {
            // The vendor may have reworked its threshold handling; the build
            // itself remains the authority on whether space suffices.
            tracing::warn!(
                "[ImageBuilder] Expected line `{}` not found in {:?}; leaving the script untouched",
                SPACE_LINE_SHIPPED,
                script_path
            );
        }
    }
    Ok(())
}

/// Query the container runtime for the image. Existence is never tracked
/// locally; the runtime is re-asked on every run.
pub async fn image_exists(ws: &Workspace) -> Result<bool, SetupError> {
    let output = exec::run_capture("docker", &["images", "-q", &ws.settings.image], &ws.root).await?;
    if !output.status.success() {
        return Err(SetupError::CommandFailed {
            program: "docker images".to_string(),
            status: output.status,
        });
    }
    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
}

/// Build the database image unless it already exists.
pub async fn ensure_image(ws: &Workspace) -> Result<(), SetupError> {
    if image_exists(ws).await? {
        tracing::info!(
            "[ImageBuilder] Image {} already present; run `oractl setup --clean` to force a rebuild",
            ws.settings.image
        );
        return Ok(());
    }

    patch_space_check(ws).await?;

    tracing::info!(
        "[ImageBuilder] Building {} with {} -v {} -e (this takes a while)",
        ws.settings.image,
        ws.settings.build_script,
        ws.settings.db_version
    );

    // The entrypoint must run from the build-script directory; only the child
    // gets that working directory, the process-global one is untouched.
    let entrypoint = format!("./{}", ws.settings.build_script);
    let status = exec::run_streaming(
        &entrypoint,
        &["-v", &ws.settings.db_version, "-e"],
        &ws.dockerfiles_dir(),
    )
    .await?;

    if !status.success() {
        return Err(SetupError::BuildFailed {
            image: ws.settings.image.clone(),
            status,
        });
    }
    Ok(())
}

/// `--clean`: bring the deployment down and remove the image so the build
/// starts from an empty state. Both steps are best-effort.
pub async fn clean(ws: &Workspace, compose: &ComposeCommand) -> Result<(), SetupError> {
    if ws.compose_file().is_file() {
        // Containers may not exist yet; a failed down is not a problem.
        match compose.run_streaming(&["down"], &ws.root).await {
            Ok(status) if status.success() => {
                tracing::info!("[ImageBuilder] Existing deployment brought down");
            }
            Ok(status) => {
                tracing::warn!("[ImageBuilder] compose down failed ({}), continuing", status);
            }
            Err(e) => {
                tracing::warn!("[ImageBuilder] compose down failed ({}), continuing", e);
            }
        }
    }

    if image_exists(ws).await? {
        tracing::info!("[ImageBuilder] Removing image {}", ws.settings.image);
        match exec::run_streaming("docker", &["rmi", "-f", &ws.settings.image], &ws.root).await {
            Ok(status) if status.success() => {}
            Ok(status) => {
                // The image may be in use; the rebuild can still proceed.
                tracing::warn!("[ImageBuilder] docker rmi failed ({}), continuing", status);
            }
            Err(e) => {
                tracing::warn!("[ImageBuilder] docker rmi failed ({}), continuing", e);
            }
        }
    } else {
        tracing::info!("[ImageBuilder] No image {} to remove", ws.settings.image);
    }
    Ok(())
}
