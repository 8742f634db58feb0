//! Scriptable runtime for tests: records calls, answers from a table.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockWriteGuard},
};

use infrakit_core::{
    application::{
        ApplicationError,
        ports::{ContainerRuntime, ServiceState},
    },
    error::InfrakitResult,
};

/// One call made against the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    Ping,
    EnsureNetwork(String),
    Up(PathBuf),
    Down(PathBuf),
    Ps(PathBuf),
}

#[derive(Debug, Default)]
struct RecordingInner {
    calls: Vec<RuntimeCall>,
    unavailable: bool,
    failing: HashSet<PathBuf>,
    running: HashMap<PathBuf, Vec<ServiceState>>,
}

/// In-memory [`ContainerRuntime`]. `up` marks a compose file as running
/// with one service, `down` clears it. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingRuntime {
    inner: Arc<RwLock<RecordingInner>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.inner
            .read()
            .map(|inner| inner.calls.clone())
            .unwrap_or_default()
    }

    /// Make `ping` fail.
    pub fn set_unavailable(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.unavailable = true;
        }
    }

    /// Make every command against `compose_file` fail.
    pub fn fail_on(&self, compose_file: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(compose_file.into());
        }
    }

    fn record(&self, call: RuntimeCall) -> InfrakitResult<RwLockWriteGuard<'_, RecordingInner>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.calls.push(call);
        Ok(inner)
    }
}

fn failure(verb: &str, compose_file: &Path) -> ApplicationError {
    ApplicationError::RuntimeCommandFailed {
        command: format!("docker compose -f {} {verb}", compose_file.display()),
        code: Some(1),
        stderr: "simulated failure".into(),
    }
}

fn service_name(compose_file: &Path) -> String {
    compose_file
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl ContainerRuntime for RecordingRuntime {
    fn ping(&self) -> InfrakitResult<()> {
        let inner = self.record(RuntimeCall::Ping)?;
        if inner.unavailable {
            return Err(ApplicationError::RuntimeUnavailable {
                reason: "Cannot connect to the Docker daemon".into(),
            }
            .into());
        }
        Ok(())
    }

    fn ensure_network(&self, name: &str) -> InfrakitResult<()> {
        let _inner = self.record(RuntimeCall::EnsureNetwork(name.to_string()))?;
        Ok(())
    }

    fn up(&self, compose_file: &Path) -> InfrakitResult<()> {
        let mut inner = self.record(RuntimeCall::Up(compose_file.to_path_buf()))?;
        if inner.failing.contains(compose_file) {
            return Err(failure("up -d", compose_file).into());
        }

        let service = service_name(compose_file);
        inner.running.insert(
            compose_file.to_path_buf(),
            vec![ServiceState {
                name: format!("infrakit-{service}"),
                service,
                state: "running".into(),
                status: "Up 1 second".into(),
            }],
        );
        Ok(())
    }

    fn down(&self, compose_file: &Path) -> InfrakitResult<()> {
        let mut inner = self.record(RuntimeCall::Down(compose_file.to_path_buf()))?;
        if inner.failing.contains(compose_file) {
            return Err(failure("down", compose_file).into());
        }
        inner.running.remove(compose_file);
        Ok(())
    }

    fn ps(&self, compose_file: &Path) -> InfrakitResult<Vec<ServiceState>> {
        let inner = self.record(RuntimeCall::Ps(compose_file.to_path_buf()))?;
        if inner.failing.contains(compose_file) {
            return Err(failure("ps", compose_file).into());
        }
        Ok(inner.running.get(compose_file).cloned().unwrap_or_default())
    }
}
