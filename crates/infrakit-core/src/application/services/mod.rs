//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "start these resources" or "install docker".

pub mod catalog_service;
pub mod prerequisite_service;

pub use catalog_service::{
    BatchReport, CatalogService, InstanceState, InstanceStatus, Outcome, ResourceOutcome,
};
pub use prerequisite_service::{
    PrereqReport, PrerequisiteService, RequirementOutcome, ResolveMode,
};
