// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (batch reports keep copies per resource)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("unknown catalog type '{0}'")]
    UnknownCatalog(String),

    #[error("unknown {catalog} resource '{name}'")]
    UnknownResource { catalog: String, name: String },

    #[error("no resources given for {catalog}")]
    EmptyBatch { catalog: String },

    #[error("invalid version string '{0}'")]
    InvalidVersion(String),

    // ========================================================================
    // Artifact Errors
    // ========================================================================
    #[error("invalid artifacts for '{resource}': {reason}")]
    InvalidArtifacts { resource: String, reason: String },

    #[error("Duplicate path in resource instance: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownCatalog(_) => vec![
                "Valid catalog types: infra, monitoring".into(),
                "Example: infrakit list infra".into(),
            ],
            Self::UnknownResource { catalog, .. } => vec![
                format!("Nothing was changed; the whole {} batch was rejected", catalog),
                format!("Try: infrakit list {} to see available resources", catalog),
            ],
            Self::EmptyBatch { catalog } => vec![
                "Name at least one resource, or pass --all".into(),
                format!("Example: infrakit setup {} --all", catalog),
            ],
            Self::InvalidArtifacts { resource, .. } => vec![
                format!("The template bundle for '{}' is incomplete", resource),
                "Check the templates override directory, or remove it to use built-ins".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownCatalog(_) | Self::UnknownResource { .. } | Self::EmptyBatch { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidVersion(_) => ErrorCategory::Validation,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
