//! Infrakit Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the infrakit
//! stack tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          infrakit-cli (CLI)             │
//! │     (setup/start/stop/status/prereq)    │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (CatalogService, PrerequisiteService)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Catalog, Filesystem, Runtime, Probe,   │
//! │  Installer, Prompter)                   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    infrakit-adapters (Infrastructure)   │
//! │ (BuiltinCatalog, DockerCompose, ...)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (CatalogType, ResourceArtifacts,        │
//! │  Version, OsProfile, InstallPlan)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use infrakit_core::{application::CatalogService, domain::CatalogType};
//!
//! let service = CatalogService::new(catalog, filesystem, runtime, "/srv/infrakit", "infrakit-net");
//! service.setup(CatalogType::Infra, &["postgres".to_string()]).unwrap();
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BatchReport, CatalogService, InstanceState, InstanceStatus, Outcome, PrereqReport,
        PrerequisiteService, ResolveMode, ResourceOutcome,
        ports::{ContainerRuntime, Filesystem, HostProbe, Installer, Prompter, ResourceCatalog},
    };
    pub use crate::domain::{
        CatalogType, CpuArch, OsFamily, OsProfile, RequirementState, ResourceArtifacts,
        ResourceDescriptor, ToolRequirement, ToolStatus, Version, version_at_least,
    };
    pub use crate::error::{InfrakitError, InfrakitResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
