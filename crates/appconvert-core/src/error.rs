//! Unified error handling for appconvert core.
//!
//! Wraps domain and application errors behind one type with a category (for
//! exit codes and styling) and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for a conversion.
#[derive(Debug, Error, Clone)]
pub enum ConvertError {
    /// Errors from the domain layer (bad definition, template or output).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (filesystem, registry, tasks).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl ConvertError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in appconvert".into(),
                "Re-run with -vvv and include the log when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Template => ErrorCategory::Template,
                crate::domain::ErrorCategory::Serialization => ErrorCategory::Serialization,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input: empty write content, missing title, colliding paths.
    Validation,
    /// A file or directory that should exist does not.
    NotFound,
    /// Filesystem or registry failure.
    Io,
    Template,
    Serialization,
    Internal,
}

/// Convenient result type alias.
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn domain_categories_are_mapped() {
        let err: ConvertError = DomainError::MalformedDefinition("eof".into()).into();
        assert_eq!(err.category(), ErrorCategory::Serialization);

        let err: ConvertError = DomainError::UndefinedVariable { name: "x".into() }.into();
        assert_eq!(err.category(), ErrorCategory::Template);
    }

    #[test]
    fn application_categories_pass_through() {
        let err: ConvertError = ApplicationError::FileNotFound {
            path: PathBuf::from("templates/gitignore"),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.to_string().contains("templates/gitignore"));
    }

    #[test]
    fn every_error_has_suggestions() {
        let errors: Vec<ConvertError> = vec![
            DomainError::MissingRequiredField { field: "title" }.into(),
            ApplicationError::TaskFailed {
                reason: "panicked".into(),
            }
            .into(),
            ConvertError::Internal {
                message: "oops".into(),
            },
        ];
        for err in errors {
            assert!(!err.suggestions().is_empty(), "{err}");
        }
    }
}
