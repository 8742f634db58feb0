//! Resource catalog adapters.

mod builtin;
mod overlay;

pub use builtin::{BuiltinCatalog, INFRA, MONITORING};
pub use overlay::OverlayCatalog;
