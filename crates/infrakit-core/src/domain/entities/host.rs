//! Host operating-system profile.
//!
//! Built once per process from the OS-release descriptor (or, when that file
//! is absent, from the kernel name). Read-only input to the installers.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::domain::value_objects::{CpuArch, OsFamily};

/// Detected host operating system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsProfile {
    /// `ID` from os-release (`ubuntu`, `fedora`), or the lowercased kernel name.
    pub distro_id: String,
    /// `ID_LIKE` entries, used to classify derivatives.
    pub id_like: Vec<String>,
    /// `VERSION_ID`, or `unknown`.
    pub version_id: String,
    pub pretty_name: String,
    /// Kernel name as reported by `uname -s`.
    pub kernel: String,
    pub arch: CpuArch,
}

impl OsProfile {
    /// Build a profile from the contents of `/etc/os-release`.
    pub fn from_os_release(contents: &str, kernel: &str, machine: &str) -> Self {
        let fields = parse_os_release(contents);
        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();

        let distro_id = get("ID").to_ascii_lowercase();
        let version_id = fields
            .get("VERSION_ID")
            .cloned()
            .unwrap_or_else(|| "unknown".into());
        let pretty_name = fields
            .get("PRETTY_NAME")
            .or_else(|| fields.get("NAME"))
            .cloned()
            .unwrap_or_else(|| distro_id.clone());
        let id_like = get("ID_LIKE")
            .split_whitespace()
            .map(|s| s.to_ascii_lowercase())
            .collect();

        Self {
            distro_id,
            id_like,
            version_id,
            pretty_name,
            kernel: kernel.trim().to_string(),
            arch: CpuArch::normalize(machine),
        }
    }

    /// Fallback when no os-release descriptor exists (macOS, BSDs).
    pub fn from_kernel(kernel: &str, machine: &str, version: Option<&str>) -> Self {
        let kernel = kernel.trim();
        let distro_id = match kernel.to_ascii_lowercase().as_str() {
            "darwin" => "macos".to_string(),
            other if other.is_empty() => "unknown".to_string(),
            other => other.to_string(),
        };

        Self {
            pretty_name: distro_id.clone(),
            distro_id,
            id_like: Vec::new(),
            version_id: version
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "unknown".into()),
            kernel: kernel.to_string(),
            arch: CpuArch::normalize(machine),
        }
    }

    /// Installer family for this host.
    pub fn family(&self) -> OsFamily {
        let ids = std::iter::once(self.distro_id.as_str())
            .chain(self.id_like.iter().map(String::as_str));

        for id in ids {
            match id {
                "debian" | "ubuntu" | "linuxmint" | "pop" | "raspbian" => return OsFamily::Debian,
                "fedora" | "rhel" | "centos" | "rocky" | "almalinux" => return OsFamily::Fedora,
                "arch" | "manjaro" | "endeavouros" => return OsFamily::Arch,
                "macos" => return OsFamily::MacOs,
                _ => {}
            }
        }

        if self.kernel.eq_ignore_ascii_case("darwin") {
            OsFamily::MacOs
        } else {
            OsFamily::Unsupported
        }
    }
}

impl fmt::Display for OsProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {})",
            self.distro_id, self.version_id, self.kernel, self.arch
        )
    }
}

/// Parse `KEY=VALUE` lines, stripping one level of single or double quotes.
pub fn parse_os_release(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
