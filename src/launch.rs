//! Deployment launch
//!
//! Terminal gate of the setup flow: both the orchestration descriptor and the
//! environment-config file must exist, then the service set is brought up in
//! two deliberate phases.

use crate::compose::ComposeCommand;
use crate::error::SetupError;
use crate::workdir::Workspace;

/// Bring the full deployment up.
///
/// The monitoring service is rebuilt and started first so it picks up the
/// just-resolved configuration instead of a stale cached image; only then is
/// the full service set brought up. The two phases look redundant but the
/// ordering carries the fresh-config guarantee and must not be collapsed
/// into a single call.
pub async fn bring_up(ws: &Workspace, compose: &ComposeCommand) -> Result<(), SetupError> {
    let compose_file = ws.compose_file();
    if !compose_file.is_file() {
        return Err(SetupError::MissingDeploymentFile(compose_file));
    }
    let env_file = ws.env_file();
    if !env_file.is_file() {
        return Err(SetupError::MissingDeploymentFile(env_file));
    }

    tracing::info!(
        "[Launcher] Rebuilding and starting {} service",
        ws.settings.monitoring_service
    );
    compose
        .run_checked(
            &["up", "-d", "--build", &ws.settings.monitoring_service],
            &ws.root,
        )
        .await?;

    tracing::info!("[Launcher] Bringing up the full service set");
    compose.run_checked(&["up", "-d"], &ws.root).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use tempfile::TempDir;

    // The gate must fire before any orchestrator invocation, so a detect-less
    // handle never gets used when files are missing.
    #[tokio::test]
    async fn missing_descriptor_fails_the_gate() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::locate(tmp.path().to_path_buf(), Settings::default());
        let compose = crate::compose::test_handle();

        let result = bring_up(&ws, &compose).await;
        match result {
            Err(SetupError::MissingDeploymentFile(path)) => {
                assert!(path.ends_with("docker-compose.yml"));
            }
            other => panic!("expected MissingDeploymentFile, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_config_fails_the_gate() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::locate(tmp.path().to_path_buf(), Settings::default());
        std::fs::write(ws.compose_file(), b"services: {}\n").unwrap();
        let compose = crate::compose::test_handle();

        let result = bring_up(&ws, &compose).await;
        match result {
            Err(SetupError::MissingDeploymentFile(path)) => {
                assert!(path.ends_with(".env"));
            }
            other => panic!("expected MissingDeploymentFile, got {:?}", other),
        }
    }
}
