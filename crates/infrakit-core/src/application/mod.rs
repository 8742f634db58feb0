//! Application layer for infrakit.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (CatalogService, PrerequisiteService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! catalog or version rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    BatchReport, CatalogService, InstanceState, InstanceStatus, Outcome, PrereqReport,
    PrerequisiteService, RequirementOutcome, ResolveMode, ResourceOutcome,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ContainerRuntime, Filesystem, HostProbe, Installer, Prompter, ResourceCatalog, ServiceState,
};

pub use error::ApplicationError;
