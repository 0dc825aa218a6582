//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not in the
//! conversion itself. Conversion errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while running a conversion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A file or directory to read does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The OS refused access.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Any other filesystem failure.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Package registry lookup failed.
    #[error("Registry lookup for '{package}' failed: {reason}")]
    RegistryError { package: String, reason: String },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A concurrent write task panicked or was cancelled.
    #[error("Write task failed: {reason}")]
    TaskFailed { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FileNotFound { path } => vec![
                format!("Check that {} exists", path.display()),
                "Set APPCONVERT_TEMPLATES_DIR or --templates if templates are missing".into(),
            ],
            Self::PermissionDenied { path } => vec![
                format!("Cannot access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Ensure the disk is writable and not full".into(),
            ],
            Self::RegistryError { .. } => vec![
                "Check your network connection and registry URL".into(),
                "Use --offline to skip the registry lookup".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileNotFound { .. } => ErrorCategory::NotFound,
            Self::PermissionDenied { .. }
            | Self::FilesystemError { .. }
            | Self::RegistryError { .. } => ErrorCategory::Io,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::TaskFailed { .. } => ErrorCategory::Internal,
        }
    }
}
