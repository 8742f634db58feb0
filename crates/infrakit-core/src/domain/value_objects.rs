//! Domain value objects: CatalogType, CpuArch, OsFamily.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. They
//! hold no lookup tables; resource and install-plan registries live in
//! `capabilities.rs` and in the adapters' built-in catalog.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── CatalogType ───────────────────────────────────────────────────────────────

/// Partition of the resource namespace. A resource name only has meaning
/// relative to its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogType {
    Infra,
    Monitoring,
}

impl CatalogType {
    pub const ALL: [CatalogType; 2] = [CatalogType::Infra, CatalogType::Monitoring];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Infra => "infra",
            Self::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for CatalogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "infra" => Ok(Self::Infra),
            "monitoring" | "mon" => Ok(Self::Monitoring),
            other => Err(DomainError::UnknownCatalog(other.to_string())),
        }
    }
}

// ── CpuArch ───────────────────────────────────────────────────────────────────

/// Normalized CPU architecture.
///
/// Raw strings reported by `uname -m` vary per platform; installers only care
/// about the container-image naming (`amd64`, `arm64`, `armv7`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuArch {
    Amd64,
    Arm64,
    Armv7,
    /// Anything unrecognised is kept verbatim.
    Other(String),
}

impl CpuArch {
    pub fn normalize(raw: &str) -> Self {
        match raw.trim() {
            "x86_64" | "amd64" | "x64" => Self::Amd64,
            "aarch64" | "arm64" => Self::Arm64,
            "armv7l" | "armv7" | "armv8l" | "armhf" => Self::Armv7,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::Armv7 => "armv7",
            Self::Other(raw) => raw,
        }
    }
}

/// String form of [`CpuArch::normalize`].
pub fn normalize_arch(raw: &str) -> String {
    CpuArch::normalize(raw).as_str().to_string()
}

impl fmt::Display for CpuArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── OsFamily ──────────────────────────────────────────────────────────────────

/// Installer family derived from an [`crate::domain::OsProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    /// Debian, Ubuntu and derivatives (`apt-get`).
    Debian,
    /// Fedora, RHEL, CentOS, Rocky, Alma (`dnf`).
    Fedora,
    /// Arch Linux and derivatives (`pacman`).
    Arch,
    /// macOS (`brew`).
    MacOs,
    Unsupported,
}

impl OsFamily {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Fedora => "fedora",
            Self::Arch => "arch",
            Self::MacOs => "macos",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
