//! Host probe backed by the real machine.

use std::fs;
use std::process::Command;

use tracing::debug;

use infrakit_core::application::ports::HostProbe;

const OS_RELEASE_PATHS: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

/// Reads `/etc/os-release`, runs `uname` and resolves binaries with `which`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostProbe;

impl SystemHostProbe {
    pub fn new() -> Self {
        Self
    }

    fn stdout_of(binary: &str, args: &[&str]) -> Option<String> {
        let output = Command::new(binary).args(args).output().ok()?;
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl HostProbe for SystemHostProbe {
    fn os_release(&self) -> Option<String> {
        OS_RELEASE_PATHS
            .iter()
            .find_map(|path| fs::read_to_string(path).ok())
    }

    fn kernel_name(&self) -> String {
        Self::stdout_of("uname", &["-s"]).unwrap_or_else(|| std::env::consts::OS.to_string())
    }

    fn os_version(&self) -> Option<String> {
        Self::stdout_of("sw_vers", &["-productVersion"])
    }

    fn machine(&self) -> String {
        Self::stdout_of("uname", &["-m"]).unwrap_or_else(|| std::env::consts::ARCH.to_string())
    }

    fn command_exists(&self, binary: &str) -> bool {
        which::which(binary).is_ok()
    }

    fn command_output(&self, binary: &str, args: &[&str]) -> Option<String> {
        let path = which::which(binary).ok()?;
        let output = match Command::new(path).args(args).output() {
            Ok(output) => output,
            Err(e) => {
                debug!(binary, error = %e, "Probe failed to spawn");
                return None;
            }
        };

        if !output.status.success() {
            debug!(binary, ?args, code = ?output.status.code(), "Probe exited non-zero");
            return None;
        }

        // Some tools print their version on stderr.
        Some(combined_output(&output.stdout, &output.stderr))
    }
}

/// Stdout then stderr, always on separate lines so digits never run together.
fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(stderr));
    }
    combined
}
