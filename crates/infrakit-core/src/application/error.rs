//! Application layer errors.
//!
//! These errors represent failures talking to the outside world (filesystem,
//! container runtime, host tools), not catalog rules. Rule violations are
//! `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The container runtime ran and exited non-zero.
    #[error("`{command}` failed{}: {stderr}", exit_suffix(.code))]
    RuntimeCommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The container runtime binary or daemon cannot be reached.
    #[error("Container runtime unavailable: {reason}")]
    RuntimeUnavailable { reason: String },

    /// A required host tool is missing or too old.
    #[error("Required tool '{tool}' is not ready: {reason}")]
    PreconditionFailed {
        tool: String,
        reason: String,
        remediation: String,
    },

    /// An install plan step failed.
    #[error("Installing '{tool}' failed: {reason}")]
    InstallFailed { tool: String, reason: String },

    /// The confirmation prompt could not be shown or read.
    #[error("Prompt failed: {reason}")]
    PromptFailed { reason: String },

    /// In-memory adapter lock poisoned.
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" with exit code {c}"))
        .unwrap_or_default()
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Re-run setup once the problem is fixed; setup is idempotent".into(),
            ],
            Self::RuntimeCommandFailed { command, .. } => vec![
                format!("Command: {}", command),
                "Check the runtime output above for details".into(),
            ],
            Self::RuntimeUnavailable { .. } => vec![
                "Make sure the Docker daemon is running (e.g. `sudo systemctl start docker`)".into(),
                "Check prerequisites with: infrakit prereq --check".into(),
            ],
            Self::PreconditionFailed { remediation, .. } => vec![
                remediation.clone(),
                "Run `infrakit prereq` to install missing tools interactively".into(),
            ],
            Self::InstallFailed { tool, .. } => vec![
                format!("Install {} manually, then re-run `infrakit prereq --check`", tool),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::RuntimeCommandFailed { .. } | Self::InstallFailed { .. } => {
                ErrorCategory::External
            }
            Self::RuntimeUnavailable { .. } | Self::PreconditionFailed { .. } => {
                ErrorCategory::Precondition
            }
            Self::PromptFailed { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
