//! Container runtime adapters.

mod docker;
mod recording;

pub use docker::{DockerCompose, NETWORK_ENV, parse_ps_output};
pub use recording::{RecordingRuntime, RuntimeCall};
