// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for infrakit.
//!
//! This module contains pure logic: catalog types, generated artifacts,
//! version comparison, OS classification and install-plan lookup. All I/O
//! (filesystem, container runtime, host probes) is reached through ports
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, process, or network calls
//! - **Immutable entities**: Descriptors are `Copy`, artifacts are plain data
//!
// Public API - what the world sees
pub mod capabilities;
pub mod entities;
pub mod error;
pub mod value_objects;
pub mod version;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    common::{Permissions, RelativePath},
    host::{OsProfile, parse_os_release},
    instance::{DirectoryToCreate, FileToWrite, FsEntry, ResourceInstance},
    requirement::{RequirementState, ToolRequirement, ToolStatus},
    resource::{
        COMPOSE_FILE, ConfigFile, ENV_FILE, Generator, INSTANCE_DIRS, ResourceArtifacts,
        ResourceDescriptor,
    },
};

pub use capabilities::{InstallPlan, InstallStep};
pub use error::{DomainError, ErrorCategory};
pub use validation::DomainValidator;
pub use value_objects::{CatalogType, CpuArch, OsFamily, normalize_arch};
pub use version::{Version, extract_version, version_at_least};
