//! Tool requirements and the per-requirement state machine.
//!
//! ```text
//! Unchecked ──check──▶ Satisfied
//!           ├────────▶ BelowMinimum ──install──▶ Satisfied | InstallFailed
//!           └────────▶ Missing      ──install──▶ Satisfied | InstallFailed
//! ```
//!
//! In check-only mode `BelowMinimum` and `Missing` are terminal.

use std::fmt;

use serde::Serialize;

use crate::domain::version::Version;

/// A host tool the rest of the system depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolRequirement {
    /// Stable identifier, also the key into the install-plan registry.
    pub tool: &'static str,
    /// Executable looked up on `PATH`.
    pub binary: &'static str,
    /// Arguments that make `binary` print its version.
    pub version_args: &'static [&'static str],
    pub min_version: Version,
    /// Required tools gate the catalog operations; optional ones only warn.
    pub required: bool,
    /// Where to read about manual installation.
    pub docs_url: &'static str,
}

impl ToolRequirement {
    /// Human-readable probe command, e.g. `docker compose version`.
    pub fn probe_command(&self) -> String {
        std::iter::once(self.binary)
            .chain(self.version_args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ToolRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} >= {}", self.tool, self.min_version)
    }
}

/// Result of probing a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "version", rename_all = "snake_case")]
pub enum ToolStatus {
    Installed(Version),
    Missing,
}

/// Where a requirement is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RequirementState {
    Unchecked,
    Satisfied { version: Version },
    BelowMinimum { found: Version, required: Version },
    Missing,
    InstallFailed { reason: String },
}

impl RequirementState {
    /// Classify a probe result against the minimum version.
    pub fn from_status(status: ToolStatus, min: Version) -> Self {
        match status {
            ToolStatus::Installed(found) if found.satisfies(&min) => {
                Self::Satisfied { version: found }
            }
            ToolStatus::Installed(found) => Self::BelowMinimum {
                found,
                required: min,
            },
            ToolStatus::Missing => Self::Missing,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }

    /// States an install attempt may move forward.
    pub fn needs_install(&self) -> bool {
        matches!(self, Self::Missing | Self::BelowMinimum { .. })
    }
}

impl fmt::Display for RequirementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchecked => f.write_str("unchecked"),
            Self::Satisfied { version } => write!(f, "ok ({version})"),
            Self::BelowMinimum { found, required } => {
                write!(f, "too old ({found} < {required})")
            }
            Self::Missing => f.write_str("missing"),
            Self::InstallFailed { reason } => write!(f, "install failed: {reason}"),
        }
    }
}
