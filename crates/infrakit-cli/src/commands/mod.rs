//! Command handlers and the adapter wiring they share.

use tracing::{debug, warn};

use infrakit_adapters::{
    BuiltinCatalog, DockerCompose, LocalFilesystem, OverlayCatalog, ShellInstaller,
    SystemHostProbe,
};
use infrakit_core::{
    application::{CatalogService, PrerequisiteService, ports::ResourceCatalog},
    domain::capabilities::REQUIREMENTS,
};

use crate::{cli::GlobalArgs, config::AppConfig, error::CliResult, prompt};

pub mod batch;
pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod prereq;
pub mod status;

/// Catalog service over the real filesystem and docker compose.
///
/// A configured templates directory swaps the embedded catalog for an
/// overlay of its bundles.
pub fn catalog_service(config: &AppConfig) -> CliResult<CatalogService> {
    let catalog: Box<dyn ResourceCatalog> = match &config.paths.templates_dir {
        Some(dir) => {
            debug!(templates_dir = %dir.display(), "Using template overrides");
            Box::new(OverlayCatalog::from_dir(dir)?)
        }
        None => Box::new(BuiltinCatalog::new()),
    };

    Ok(CatalogService::new(
        catalog,
        Box::new(LocalFilesystem),
        Box::new(DockerCompose::new(
            config.runtime.binary.clone(),
            config.runtime.network.clone(),
        )),
        config.paths.base_dir.clone(),
        config.runtime.network.clone(),
    ))
}

/// Prerequisite service probing this host.
pub fn prerequisite_service() -> PrerequisiteService {
    PrerequisiteService::new(
        Box::new(SystemHostProbe::new()),
        Box::new(ShellInstaller::new()),
        prompt::prompter(),
    )
}

/// Gate a catalog verb on the host prerequisites, and on a reachable daemon
/// when the verb talks to the runtime.
pub fn ensure_ready(
    global: &GlobalArgs,
    service: &CatalogService,
    needs_runtime: bool,
) -> CliResult<()> {
    if global.skip_checks {
        warn!("Prerequisite checks skipped (--skip-checks)");
        return Ok(());
    }

    prerequisite_service().gate(REQUIREMENTS)?;
    if needs_runtime {
        service.check_runtime()?;
    }
    Ok(())
}
