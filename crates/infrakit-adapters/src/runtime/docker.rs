//! `docker compose` client.
//!
//! Every call shells out and waits for completion. Output is captured and
//! logged at `DEBUG`; a non-zero exit becomes `RuntimeCommandFailed` with
//! the trimmed stderr.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, instrument};

use infrakit_core::{
    application::{ApplicationError, ports::{ContainerRuntime, ServiceState}},
    error::InfrakitResult,
};

/// Environment variable the generated compose files read the network from.
pub const NETWORK_ENV: &str = "INFRAKIT_NETWORK";

/// Production runtime backed by the docker CLI.
#[derive(Debug, Clone)]
pub struct DockerCompose {
    binary: String,
    network: String,
}

impl DockerCompose {
    pub fn new(binary: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            network: network.into(),
        }
    }

    fn runtime_path(&self) -> InfrakitResult<PathBuf> {
        which::which(&self.binary).map_err(|e| {
            ApplicationError::RuntimeUnavailable {
                reason: format!("'{}' not found on PATH: {e}", self.binary),
            }
            .into()
        })
    }

    /// Run `docker <args>` and return its output whatever the exit status.
    fn run(&self, args: &[&str]) -> InfrakitResult<Output> {
        let runtime = self.runtime_path()?;
        let command = self.display(args);
        debug!(%command, "Running");

        let output = Command::new(runtime)
            .args(args)
            .env(NETWORK_ENV, &self.network)
            .output()
            .map_err(|e| ApplicationError::RuntimeUnavailable {
                reason: format!("failed to spawn `{command}`: {e}"),
            })?;

        debug!(
            %command,
            code = ?output.status.code(),
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "Finished"
        );
        Ok(output)
    }

    /// Run and require a zero exit status.
    fn run_checked(&self, args: &[&str]) -> InfrakitResult<Output> {
        let output = self.run(args)?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(ApplicationError::RuntimeCommandFailed {
                command: self.display(args),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into())
        }
    }

    fn compose(&self, compose_file: &Path, args: &[&str]) -> InfrakitResult<Output> {
        let file = compose_file.to_string_lossy();
        let mut full = vec!["compose", "-f", &*file];
        full.extend_from_slice(args);
        self.run_checked(&full)
    }

    fn display(&self, args: &[&str]) -> String {
        std::iter::once(self.binary.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ContainerRuntime for DockerCompose {
    fn ping(&self) -> InfrakitResult<()> {
        let output = self.run(&["info", "--format", "{{.ServerVersion}}"])?;
        if output.status.success() {
            debug!(server = %String::from_utf8_lossy(&output.stdout).trim(), "Daemon reachable");
            Ok(())
        } else {
            Err(ApplicationError::RuntimeUnavailable {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into())
        }
    }

    #[instrument(skip(self))]
    fn ensure_network(&self, name: &str) -> InfrakitResult<()> {
        if self.run(&["network", "inspect", name])?.status.success() {
            debug!(network = name, "Network exists");
            return Ok(());
        }

        match self.run_checked(&["network", "create", name]) {
            Ok(_) => {
                debug!(network = name, "Network created");
                Ok(())
            }
            // Lost a race with a concurrent invocation.
            Err(e) if e.to_string().contains("already exists") => Ok(()),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self), fields(file = %compose_file.display()))]
    fn up(&self, compose_file: &Path) -> InfrakitResult<()> {
        self.compose(compose_file, &["up", "-d", "--remove-orphans"])
            .map(|_| ())
    }

    #[instrument(skip(self), fields(file = %compose_file.display()))]
    fn down(&self, compose_file: &Path) -> InfrakitResult<()> {
        self.compose(compose_file, &["down"]).map(|_| ())
    }

    #[instrument(skip(self), fields(file = %compose_file.display()))]
    fn ps(&self, compose_file: &Path) -> InfrakitResult<Vec<ServiceState>> {
        let output = self.compose(compose_file, &["ps", "--all", "--format", "json"])?;
        parse_ps_output(&String::from_utf8_lossy(&output.stdout)).map_err(|e| {
            ApplicationError::RuntimeCommandFailed {
                command: format!("{} compose ps", self.binary),
                code: output.status.code(),
                stderr: format!("unexpected output: {e}"),
            }
            .into()
        })
    }
}

/// Compose v2 prints either one JSON array or one object per line,
/// depending on the release.
pub fn parse_ps_output(stdout: &str) -> Result<Vec<ServiceState>, serde_json::Error> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed);
    }
    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(serde_json::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ndjson() {
        let out = concat!(
            r#"{"Name":"infrakit-loki","Service":"loki","State":"running","Status":"Up 5 minutes","Publishers":[]}"#,
            "\n",
            r#"{"Name":"infrakit-tempo","Service":"tempo","State":"exited","Status":"Exited (1)"}"#,
            "\n"
        );
        let states = parse_ps_output(out).unwrap();
        assert_eq!(states.len(), 2);
        assert!(states[0].is_running());
        assert_eq!(states[1].state, "exited");
    }

    #[test]
    fn parses_json_array() {
        let out = r#"[{"Name":"infrakit-redis","Service":"redis","State":"running","Status":"Up"}]"#;
        let states = parse_ps_output(out).unwrap();
        assert_eq!(states[0].service, "redis");
    }

    #[test]
    fn empty_output_means_no_containers() {
        assert!(parse_ps_output("\n").unwrap().is_empty());
        assert!(parse_ps_output("[]").unwrap().is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_ps_output("NAME  IMAGE  STATUS").is_err());
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let runtime = DockerCompose::new("infrakit-no-such-docker", "net");
        let err = runtime.ping().unwrap_err();
        assert!(matches!(
            err,
            infrakit_core::error::InfrakitError::Application(
                ApplicationError::RuntimeUnavailable { .. }
            )
        ));
    }
}
