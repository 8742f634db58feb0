//! Catalog Service - resource lifecycle orchestrator.
//!
//! This service coordinates every catalog verb:
//! 1. Validate the whole batch against the catalog
//! 2. Render artifacts in memory
//! 3. Materialize instance directories / drive the container runtime
//!
//! Once a batch is validated, a failing resource never stops the ones after
//! it; each gets its own [`ResourceOutcome`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::{ContainerRuntime, Filesystem, ResourceCatalog, ServiceState},
    domain::{
        COMPOSE_FILE, CatalogType, DomainValidator as validator, FsEntry, ResourceArtifacts,
        ResourceDescriptor, ResourceInstance,
    },
    error::{InfrakitError, InfrakitResult},
};

/// What happened to one resource of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum Outcome {
    Done(String),
    Skipped(String),
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Done(m) | Self::Skipped(m) | Self::Failed(m) => m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceOutcome {
    pub name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Per-resource outcomes of a batch, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<ResourceOutcome>,
}

impl BatchReport {
    fn record(&mut self, name: &str, outcome: Outcome) {
        self.outcomes.push(ResourceOutcome {
            name: name.to_string(),
            outcome,
        });
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.outcome.is_failure())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(|o| o.outcome.is_failure())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Observed state of one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum InstanceState {
    /// No compose descriptor on disk.
    NotSetUp,
    /// Set up, but the runtime knows no containers for it.
    NoContainers,
    Running(Vec<ServiceState>),
    /// The runtime query failed for this resource only.
    Error(String),
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSetUp => f.write_str("not set up"),
            Self::NoContainers => f.write_str("no containers"),
            Self::Running(services) => {
                let up = services.iter().filter(|s| s.is_running()).count();
                write!(f, "{up}/{} running", services.len())
            }
            Self::Error(reason) => write!(f, "error: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceStatus {
    pub resource: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub state: InstanceState,
}

/// Resource lifecycle service.
pub struct CatalogService {
    catalog: Box<dyn ResourceCatalog>,
    filesystem: Box<dyn Filesystem>,
    runtime: Box<dyn ContainerRuntime>,
    base_dir: PathBuf,
    network: String,
}

impl CatalogService {
    pub fn new(
        catalog: Box<dyn ResourceCatalog>,
        filesystem: Box<dyn Filesystem>,
        runtime: Box<dyn ContainerRuntime>,
        base_dir: impl Into<PathBuf>,
        network: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            filesystem,
            runtime,
            base_dir: base_dir.into(),
            network: network.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resources of a catalog, in declared order.
    pub fn list(&self, catalog: CatalogType) -> Vec<ResourceDescriptor> {
        self.catalog.list(catalog)
    }

    /// Every name of a catalog, for `--all`.
    pub fn all_names(&self, catalog: CatalogType) -> Vec<String> {
        self.list(catalog)
            .iter()
            .map(|d| d.name.to_string())
            .collect()
    }

    /// Check the whole batch and return the descriptors in request order.
    pub fn validate(
        &self,
        catalog: CatalogType,
        names: &[String],
    ) -> InfrakitResult<Vec<ResourceDescriptor>> {
        let known = self.catalog.list(catalog);
        validator::validate_batch(catalog, &known, names)?;

        Ok(names
            .iter()
            .filter_map(|name| known.iter().find(|d| d.name == name.as_str()).copied())
            .collect())
    }

    /// `<base>/<catalog>/<name>`.
    pub fn instance_dir(&self, catalog: CatalogType, name: &str) -> PathBuf {
        self.base_dir.join(catalog.as_str()).join(name)
    }

    /// Fails with `RuntimeUnavailable` when the daemon cannot be reached.
    pub fn check_runtime(&self) -> InfrakitResult<()> {
        self.runtime.ping()
    }

    /// Generate instance directories.
    ///
    /// Every resource is rendered and validated before the first write.
    /// Re-running produces byte-identical files; nothing is ever deleted.
    #[instrument(skip_all, fields(catalog = %catalog, count = names.len()))]
    pub fn setup(&self, catalog: CatalogType, names: &[String]) -> InfrakitResult<BatchReport> {
        let descriptors = self.validate(catalog, names)?;

        let rendered: Vec<(ResourceDescriptor, InfrakitResult<ResourceArtifacts>)> = descriptors
            .into_iter()
            .map(|d| (d, self.render_checked(&d)))
            .collect();

        self.filesystem.create_dir_all(&self.base_dir)?;

        let mut report = BatchReport::default();
        for (descriptor, artifacts) in rendered {
            let root = self.instance_dir(catalog, descriptor.name);

            let outcome = match artifacts.and_then(|a| self.materialize(&root, &a)) {
                Ok(files) => {
                    info!(resource = descriptor.name, files, "Instance generated");
                    Outcome::Done(format!("generated {}", root.display()))
                }
                Err(e) => {
                    warn!(
                        resource = descriptor.name,
                        path = %root.display(),
                        error = %e,
                        "Setup failed, instance needs re-setup"
                    );
                    Outcome::Failed(format!("{e} (re-run setup)"))
                }
            };
            report.record(descriptor.name, outcome);
        }

        Ok(report)
    }

    /// Bring resources up. Ensures the shared network once per batch.
    #[instrument(skip_all, fields(catalog = %catalog, count = names.len()))]
    pub fn start(&self, catalog: CatalogType, names: &[String]) -> InfrakitResult<BatchReport> {
        let descriptors = self.validate(catalog, names)?;

        self.runtime.ensure_network(&self.network)?;
        debug!(network = %self.network, "Shared network ready");

        let mut report = BatchReport::default();
        for descriptor in descriptors {
            let compose = self.instance_dir(catalog, descriptor.name).join(COMPOSE_FILE);

            let outcome = if !self.filesystem.exists(&compose) {
                warn!(resource = descriptor.name, "Not set up, cannot start");
                Outcome::Failed(format!(
                    "not set up; run `infrakit setup {catalog} {}` first",
                    descriptor.name
                ))
            } else {
                match self.runtime.up(&compose) {
                    Ok(()) => {
                        info!(resource = descriptor.name, "Started");
                        Outcome::Done("started".into())
                    }
                    Err(e) => {
                        warn!(resource = descriptor.name, error = %e, "Start failed");
                        Outcome::Failed(e.to_string())
                    }
                }
            };
            report.record(descriptor.name, outcome);
        }

        Ok(report)
    }

    /// Take resources down. Volumes and data directories are kept.
    #[instrument(skip_all, fields(catalog = %catalog, count = names.len()))]
    pub fn stop(&self, catalog: CatalogType, names: &[String]) -> InfrakitResult<BatchReport> {
        let descriptors = self.validate(catalog, names)?;

        let mut report = BatchReport::default();
        for descriptor in descriptors {
            let compose = self.instance_dir(catalog, descriptor.name).join(COMPOSE_FILE);

            let outcome = if !self.filesystem.exists(&compose) {
                warn!(resource = descriptor.name, "Not set up, nothing to stop");
                Outcome::Skipped("not set up".into())
            } else {
                match self.runtime.down(&compose) {
                    Ok(()) => {
                        info!(resource = descriptor.name, "Stopped");
                        Outcome::Done("stopped".into())
                    }
                    Err(e) => {
                        warn!(resource = descriptor.name, error = %e, "Stop failed");
                        Outcome::Failed(e.to_string())
                    }
                }
            };
            report.record(descriptor.name, outcome);
        }

        Ok(report)
    }

    /// Status of one resource, or of every instance directory of a catalog.
    #[instrument(skip(self))]
    pub fn status(
        &self,
        catalog: CatalogType,
        name: Option<&str>,
    ) -> InfrakitResult<Vec<InstanceStatus>> {
        let names = match name {
            Some(name) => {
                let names = vec![name.to_string()];
                self.validate(catalog, &names)?;
                names
            }
            None => self
                .filesystem
                .list_dirs(&self.base_dir.join(catalog.as_str()))?,
        };

        Ok(names
            .into_iter()
            .map(|name| {
                let path = self.instance_dir(catalog, &name);
                let state = self.instance_state(&path);
                InstanceStatus {
                    resource: name,
                    path,
                    state,
                }
            })
            .collect())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn render_checked(&self, descriptor: &ResourceDescriptor) -> InfrakitResult<ResourceArtifacts> {
        let artifacts = self.catalog.render(descriptor)?;
        validator::validate_artifacts(descriptor.name, &artifacts)?;
        Ok(artifacts)
    }

    /// Write one instance; returns the number of files written.
    fn materialize(&self, root: &Path, artifacts: &ResourceArtifacts) -> InfrakitResult<usize> {
        let instance = ResourceInstance::from_artifacts(root, artifacts);
        validator::validate_instance(&instance).map_err(InfrakitError::Domain)?;

        let mut written = 0;
        for entry in instance.entries() {
            let path = root.join(entry.path());
            match entry {
                FsEntry::Directory(_) => self.filesystem.create_dir_all(&path)?,
                FsEntry::File(file) => {
                    self.filesystem.write_file(&path, &file.content)?;
                    if file.permissions.executable_flag() {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                    written += 1;
                }
            }
        }

        Ok(written)
    }

    fn instance_state(&self, root: &Path) -> InstanceState {
        let compose = root.join(COMPOSE_FILE);
        if !self.filesystem.exists(&compose) {
            return InstanceState::NotSetUp;
        }

        match self.runtime.ps(&compose) {
            Ok(services) if services.is_empty() => InstanceState::NoContainers,
            Ok(services) => InstanceState::Running(services),
            Err(e) => {
                warn!(path = %root.display(), error = %e, "Status query failed");
                InstanceState::Error(e.to_string())
            }
        }
    }
}
