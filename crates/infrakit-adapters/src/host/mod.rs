//! Host probe adapters.

mod fixed;
mod system;

pub use fixed::StaticHostProbe;
pub use system::SystemHostProbe;
