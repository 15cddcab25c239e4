//! oractl: lifecycle manager for a containerized Oracle database lab
//!
//! Takes a host from "nothing installed" to a running two-instance database
//! deployment plus monitoring dashboard, and exposes idempotent lifecycle
//! verbs afterwards. The database image, the compose services, and the
//! monitoring app are external collaborators; this crate only orchestrates
//! their invocation.

pub mod compose;
pub mod error;
pub mod exec;
pub mod host;
pub mod image;
pub mod launch;
pub mod lifecycle;
pub mod settings;
pub mod setup;
pub mod vendor;
pub mod workdir;

pub use compose::{ComposeCommand, ComposeForm};
pub use error::SetupError;
pub use host::{check_host_requirements, CheckItem, HostCheckResult};
pub use lifecycle::LifecycleVerb;
pub use settings::Settings;
pub use setup::{run_setup, SetupOptions};
pub use vendor::{OperatorPrompt, StdinPrompt};
pub use workdir::Workspace;
