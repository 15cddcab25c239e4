//! Fixed deployment constants
//!
//! Everything name- or path-shaped lives here so the rest of the crate never
//! hardcodes a vendor detail. The defaults target Oracle Database 19.3.0
//! Enterprise Edition built from the upstream `oracle/docker-images` tree.

/// Names and locations the setup flow operates on.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Project subdirectory to descend into when invoked from a parent checkout.
    pub project_dir: String,
    /// Orchestration descriptor consumed by the compose command.
    pub compose_file: String,
    /// Environment-config file consumed by the descriptor.
    pub env_file: String,
    /// Default-named template renamed into place when `env_file` is absent.
    pub env_template: String,

    /// Remote the vendor tree is cloned from.
    pub vendor_url: String,
    /// Directory name the clone produces under the working-directory root.
    pub vendor_dir: String,
    /// Build-script directory, relative to the vendor root.
    pub dockerfiles_subdir: String,
    /// Database version passed to the build entrypoint; also names the
    /// version subdirectory the installation artifact must land in.
    pub db_version: String,
    /// Vendor build entrypoint (also carries the disk-space precondition).
    pub build_script: String,

    /// Proprietary installation archive the vendor build requires.
    pub artifact_name: String,
    /// Where the operator obtains the artifact.
    pub artifact_source_url: String,

    /// Image the vendor build produces, as `name:tag`.
    pub image: String,
    /// Compose service rebuilt ahead of the full bring-up.
    pub monitoring_service: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_dir: "oracle-lab".to_string(),
            compose_file: "docker-compose.yml".to_string(),
            env_file: ".env".to_string(),
            env_template: "env.example".to_string(),
            vendor_url: "https://github.com/oracle/docker-images.git".to_string(),
            vendor_dir: "docker-images".to_string(),
            dockerfiles_subdir: "OracleDatabase/SingleInstance/dockerfiles".to_string(),
            db_version: "19.3.0".to_string(),
            build_script: "buildContainerImage.sh".to_string(),
            artifact_name: "LINUX.X64_193000_db_home.zip".to_string(),
            artifact_source_url:
                "https://www.oracle.com/database/technologies/oracle19c-linux-downloads.html"
                    .to_string(),
            image: "oracle/database:19.3.0-ee".to_string(),
            monitoring_service: "monitoring".to_string(),
        }
    }
}
