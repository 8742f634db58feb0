//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `infrakit-adapters` crate provides implementations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{CatalogType, InstallPlan, ResourceArtifacts, ResourceDescriptor};
use crate::error::InfrakitResult;

/// Port for the resource catalog.
///
/// Implemented by:
/// - `infrakit_adapters::catalog::BuiltinCatalog` (embedded templates)
/// - `infrakit_adapters::catalog::OverlayCatalog` (user template bundles)
#[cfg_attr(test, mockall::automock)]
pub trait ResourceCatalog: Send + Sync {
    /// Every resource of `catalog`, in declared order.
    fn list(&self, catalog: CatalogType) -> Vec<ResourceDescriptor>;

    /// Render the artifacts for one resource.
    fn render(&self, descriptor: &ResourceDescriptor) -> InfrakitResult<ResourceArtifacts> {
        Ok(descriptor.generate())
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `infrakit_adapters::filesystem::LocalFilesystem` (production)
/// - `infrakit_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Writes overwrite; nothing in this port deletes
/// - Permissions are capability-based, not Unix-specific
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> InfrakitResult<()>;

    /// Write content to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &str) -> InfrakitResult<()>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> InfrakitResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Names of the immediate subdirectories of `path`, sorted.
    /// A missing `path` yields an empty list.
    fn list_dirs(&self, path: &Path) -> InfrakitResult<Vec<String>>;
}

/// One container as reported by `docker compose ps`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceState {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Service")]
    pub service: String,
    /// `running`, `exited`, `restarting`, ...
    #[serde(alias = "State")]
    pub state: String,
    /// Human status line, e.g. `Up 3 minutes (healthy)`.
    #[serde(alias = "Status")]
    pub status: String,
}

impl ServiceState {
    pub fn is_running(&self) -> bool {
        self.state.eq_ignore_ascii_case("running")
    }
}

/// Port for the container runtime.
///
/// Implemented by:
/// - `infrakit_adapters::runtime::DockerCompose` (production)
/// - `infrakit_adapters::runtime::RecordingRuntime` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait ContainerRuntime: Send + Sync {
    /// Succeeds when the runtime daemon answers.
    fn ping(&self) -> InfrakitResult<()>;

    /// Create the shared external network unless it already exists.
    fn ensure_network(&self, name: &str) -> InfrakitResult<()>;

    /// Bring up the services of a compose descriptor, detached.
    fn up(&self, compose_file: &Path) -> InfrakitResult<()>;

    /// Tear down the services of a compose descriptor. Volumes are kept.
    fn down(&self, compose_file: &Path) -> InfrakitResult<()>;

    /// Containers belonging to a compose descriptor.
    fn ps(&self, compose_file: &Path) -> InfrakitResult<Vec<ServiceState>>;
}

/// Port for reading facts about the host.
///
/// Implemented by:
/// - `infrakit_adapters::host::SystemHostProbe` (production)
/// - `infrakit_adapters::host::StaticHostProbe` (testing)
pub trait HostProbe: Send + Sync {
    /// Contents of `/etc/os-release`, if present.
    fn os_release(&self) -> Option<String>;

    /// Kernel name, as `uname -s`.
    fn kernel_name(&self) -> String;

    /// OS product version where no os-release exists (`sw_vers` on macOS).
    fn os_version(&self) -> Option<String>;

    /// Machine hardware name, as `uname -m`.
    fn machine(&self) -> String;

    /// Whether `binary` resolves on `PATH`.
    fn command_exists(&self, binary: &str) -> bool;

    /// Combined stdout and stderr of a successful run, `None` when the
    /// command could not run or exited non-zero.
    fn command_output(&self, binary: &str, args: &[&str]) -> Option<String>;
}

/// Port for executing install plans.
#[cfg_attr(test, mockall::automock)]
pub trait Installer: Send + Sync {
    /// Run every step in order; the first failing step aborts the plan.
    fn run(&self, plan: &InstallPlan) -> InfrakitResult<()>;
}

/// Port for yes/no questions.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    fn confirm(&self, question: &str, default: bool) -> InfrakitResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_state_is_case_insensitive() {
        let state = ServiceState {
            state: "Running".into(),
            ..Default::default()
        };
        assert!(state.is_running());
        assert!(!ServiceState::default().is_running());
    }
}
