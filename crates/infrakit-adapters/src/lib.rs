//! Infrastructure adapters for infrakit.
//!
//! This crate implements the ports defined in `infrakit-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod catalog;
pub mod filesystem;
pub mod host;
pub mod installer;
pub mod runtime;
pub mod template_loader;

// Re-export commonly used adapters
pub use catalog::{BuiltinCatalog, OverlayCatalog};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use host::{StaticHostProbe, SystemHostProbe};
pub use installer::ShellInstaller;
pub use runtime::{DockerCompose, RecordingRuntime, RuntimeCall};
pub use template_loader::TemplateBundleLoader;
