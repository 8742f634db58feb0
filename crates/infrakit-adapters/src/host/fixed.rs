//! Host probe with canned answers, for tests and dry runs.

use std::collections::HashMap;

use infrakit_core::application::ports::HostProbe;

/// Builder-style fake: declare the OS and each tool's version output.
#[derive(Debug, Clone, Default)]
pub struct StaticHostProbe {
    os_release: Option<String>,
    kernel: String,
    os_version: Option<String>,
    machine: String,
    /// Probe command line (`docker compose version`) → output.
    outputs: HashMap<String, String>,
    /// Binaries on `PATH` whose version probe fails.
    broken: Vec<String>,
}

impl StaticHostProbe {
    /// Ubuntu 22.04 on x86_64 with no tools installed.
    pub fn ubuntu() -> Self {
        Self {
            os_release: Some(
                "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\nVERSION_ID=\"22.04\"\nPRETTY_NAME=\"Ubuntu 22.04.4 LTS\"\n"
                    .into(),
            ),
            kernel: "Linux".into(),
            machine: "x86_64".into(),
            ..Default::default()
        }
    }

    /// macOS on Apple silicon, no os-release file.
    pub fn macos() -> Self {
        Self {
            kernel: "Darwin".into(),
            os_version: Some("14.4".into()),
            machine: "arm64".into(),
            ..Default::default()
        }
    }

    pub fn with_os_release(mut self, contents: impl Into<String>) -> Self {
        self.os_release = Some(contents.into());
        self
    }

    pub fn with_machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = machine.into();
        self
    }

    /// Install a tool whose probe `command` prints `output`.
    pub fn with_tool(mut self, command: &str, output: &str) -> Self {
        self.outputs.insert(command.to_string(), output.to_string());
        self
    }

    /// A binary that resolves on `PATH` but whose probe exits non-zero.
    pub fn with_broken(mut self, binary: &str) -> Self {
        self.broken.push(binary.to_string());
        self
    }

    /// Docker 24.0.7 and compose v2.21.0.
    pub fn with_docker(self) -> Self {
        self.with_tool("docker --version", "Docker version 24.0.7, build afdd53b")
            .with_tool("docker compose version", "Docker Compose version v2.21.0")
    }
}

impl HostProbe for StaticHostProbe {
    fn os_release(&self) -> Option<String> {
        self.os_release.clone()
    }

    fn kernel_name(&self) -> String {
        self.kernel.clone()
    }

    fn os_version(&self) -> Option<String> {
        self.os_version.clone()
    }

    fn machine(&self) -> String {
        self.machine.clone()
    }

    fn command_exists(&self, binary: &str) -> bool {
        self.broken.iter().any(|b| b == binary)
            || self
                .outputs
                .keys()
                .any(|command| command.split(' ').next() == Some(binary))
    }

    fn command_output(&self, binary: &str, args: &[&str]) -> Option<String> {
        let command = std::iter::once(binary)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.outputs.get(&command).cloned()
    }
}
