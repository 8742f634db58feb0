pub mod common;
pub mod host;
pub mod instance;
pub mod requirement;
pub mod resource;

pub use crate::domain::DomainError;
pub use host::OsProfile;
pub use instance::ResourceInstance;
pub use requirement::{RequirementState, ToolRequirement, ToolStatus};
pub use resource::{ResourceArtifacts, ResourceDescriptor};
