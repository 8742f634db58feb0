//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `infrakit-adapters` (and the
//! prompter in `infrakit-cli`) implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ResourceCatalog`: Static resource table and artifact rendering
//!   - `Filesystem`: Instance directory operations
//!   - `ContainerRuntime`: `up` / `down` / `ps` against a compose descriptor
//!   - `HostProbe`: OS descriptor, kernel, `PATH` lookup, version output
//!   - `Installer`: Runs an install plan
//!   - `Prompter`: Yes/no confirmation

pub mod output;

pub use output::{
    ContainerRuntime, Filesystem, HostProbe, Installer, Prompter, ResourceCatalog, ServiceState,
};

#[cfg(test)]
pub use output::{MockContainerRuntime, MockInstaller, MockPrompter, MockResourceCatalog};
