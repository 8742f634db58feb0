//! Tool version parsing and comparison.
//!
//! Versions are normalized to `MAJOR.MINOR`; the patch component is
//! discarded before comparison. Ordering is numeric per component, so
//! `20.10` ranks above `9.9`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// A normalized `MAJOR.MINOR` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Parse `MAJOR[.MINOR[.PATCH...]]`, with an optional leading `v`.
    ///
    /// Each component may carry a non-numeric suffix (`10-ce`, `3rc1`); only
    /// its leading digits count. A missing minor is `0`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let mut parts = trimmed.split('.');
        let major = parts
            .next()
            .and_then(leading_number)
            .ok_or_else(|| DomainError::InvalidVersion(raw.to_string()))?;
        let minor = match parts.next() {
            Some(part) => {
                leading_number(part).ok_or_else(|| DomainError::InvalidVersion(raw.to_string()))?
            }
            None => 0,
        };

        Ok(Self { major, minor })
    }

    /// `true` when `self >= required` (inclusive lower bound).
    pub fn satisfies(&self, required: &Version) -> bool {
        self >= required
    }
}

fn leading_number(part: &str) -> Option<u64> {
    let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Compare two raw version strings after normalizing both to `MAJOR.MINOR`.
///
/// Returns `false` when either side cannot be parsed.
pub fn version_at_least(actual: &str, required: &str) -> bool {
    match (Version::parse(actual), Version::parse(required)) {
        (Ok(actual), Ok(required)) => actual.satisfies(&required),
        _ => false,
    }
}

/// Extract the first `MAJOR.MINOR[.PATCH]` token from a tool's
/// self-reported version output.
///
/// `"Docker version 24.0.7, build afdd53b"` yields `"24.0.7"`.
pub fn extract_version(output: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("version pattern is a valid regex")
    });

    pattern.find(output).map(|m| m.as_str().to_string())
}
