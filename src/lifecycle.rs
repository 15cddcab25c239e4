//! Post-setup lifecycle verbs
//!
//! Pure command routing: one case per verb, passed straight through to the
//! resolved compose command. No state is shared beyond the invocation form.

use crate::compose::ComposeCommand;
use crate::error::SetupError;
use crate::workdir::Workspace;

/// Lifecycle verbs that operate on an already-set-up deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleVerb {
    Start,
    Stop,
    Restart,
    Down,
    Status,
    Logs,
}

/// Dispatch a lifecycle verb against the deployment.
///
/// `start` is the one verb with its own failure handling: when no containers
/// exist yet the orchestrator's error is followed by an advisory pointing the
/// operator at `setup`, and the verb still succeeds. All other verbs surface
/// the orchestrator's own diagnostics as-is. `logs` follows in the foreground
/// and only returns when interrupted.
pub async fn dispatch(
    verb: LifecycleVerb,
    ws: &Workspace,
    compose: &ComposeCommand,
) -> Result<(), SetupError> {
    match verb {
        LifecycleVerb::Start => {
            let status = compose.run_streaming(&["start"], &ws.root).await?;
            if !status.success() {
                tracing::warn!("[Lifecycle] No containers to start");
                eprintln!("No containers found. Run `oractl setup` to create the deployment first.");
            }
            Ok(())
        }
        LifecycleVerb::Stop => compose.run_checked(&["stop"], &ws.root).await,
        LifecycleVerb::Restart => compose.run_checked(&["restart"], &ws.root).await,
        LifecycleVerb::Down => compose.run_checked(&["down"], &ws.root).await,
        LifecycleVerb::Status => compose.run_checked(&["ps"], &ws.root).await,
        LifecycleVerb::Logs => compose.run_checked(&["logs", "-f"], &ws.root).await,
    }
}
