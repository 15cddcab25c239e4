//! Working-directory and configuration-file resolution
//!
//! The whole system is stateless between runs: every path here is re-derived
//! from the filesystem on each invocation rather than cached anywhere.

use std::path::PathBuf;

use crate::error::SetupError;
use crate::settings::Settings;

/// Resolved working-directory context. All subprocesses run relative to
/// `root`; nothing ever changes the process-global current directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub settings: Settings,
}

impl Workspace {
    /// Locate the deployment root from a starting directory.
    ///
    /// Supports being invoked from a parent checkout: if the project
    /// subdirectory exists and no orchestration descriptor is present in the
    /// starting directory, descend into the subdirectory.
    pub fn locate(start: PathBuf, settings: Settings) -> Self {
        let project_dir = start.join(&settings.project_dir);
        let root = if project_dir.is_dir() && !start.join(&settings.compose_file).is_file() {
            tracing::info!("[Workdir] Descending into {:?}", project_dir);
            project_dir
        } else {
            start
        };
        Self { root, settings }
    }

    /// Locate the root and ensure the environment-config file is in place,
    /// renaming the default-named template if needed.
    ///
    /// Idempotent: with the config already present this is a no-op. When
    /// neither the config nor the template exists no error is raised here;
    /// the launch gate reports the missing file at the point of actual need.
    pub fn resolve(start: PathBuf, settings: Settings) -> Result<Self, SetupError> {
        let ws = Self::locate(start, settings);
        ws.ensure_env_file()?;
        Ok(ws)
    }

    fn ensure_env_file(&self) -> Result<(), SetupError> {
        let env_file = self.env_file();
        if env_file.is_file() {
            tracing::info!("[Workdir] {:?} already in place", env_file);
            return Ok(());
        }
        let template = self.root.join(&self.settings.env_template);
        if template.is_file() {
            tracing::info!("[Workdir] Renaming {:?} to {:?}", template, env_file);
            std::fs::rename(&template, &env_file)?;
        }
        Ok(())
    }

    pub fn compose_file(&self) -> PathBuf {
        self.root.join(&self.settings.compose_file)
    }

    pub fn env_file(&self) -> PathBuf {
        self.root.join(&self.settings.env_file)
    }

    /// Root of the cloned vendor tree.
    pub fn vendor_root(&self) -> PathBuf {
        self.root.join(&self.settings.vendor_dir)
    }

    /// Vendor build-script directory.
    pub fn dockerfiles_dir(&self) -> PathBuf {
        self.vendor_root().join(&self.settings.dockerfiles_subdir)
    }

    /// Version subdirectory the installation artifact must land in.
    pub fn version_dir(&self) -> PathBuf {
        self.dockerfiles_dir().join(&self.settings.db_version)
    }

    /// Build-required artifact location.
    pub fn artifact_primary(&self) -> PathBuf {
        self.version_dir().join(&self.settings.artifact_name)
    }

    /// Working-directory fallback artifact location.
    pub fn artifact_fallback(&self) -> PathBuf {
        self.root.join(&self.settings.artifact_name)
    }

    pub fn build_script(&self) -> PathBuf {
        self.dockerfiles_dir().join(&self.settings.build_script)
    }
}
