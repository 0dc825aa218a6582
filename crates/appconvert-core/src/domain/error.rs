// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (a single failure may be reported by several jobs)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Serialization Errors
    // ========================================================================
    #[error("Invalid app definition at '{path}': {reason}")]
    InvalidDefinition { path: String, reason: String },

    #[error("App definition is not valid JSON: {0}")]
    MalformedDefinition(String),

    // ========================================================================
    // Template Errors
    // ========================================================================
    #[error("Template references undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    #[error("Template output is not valid {kind}: {reason}")]
    UnformattableOutput { kind: &'static str, reason: String },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Path is outside the project directory: {path}")]
    PathOutsideProject { path: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Two steps would both be written to '{path}'")]
    DuplicateOutputPath { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidDefinition { path, .. } => vec![
                format!("Inspect the definition near '{}'", path),
                "Embedded code must be a string under a 'source' key".into(),
                "'args' must be a list of parameter names".into(),
            ],
            Self::MalformedDefinition(_) => vec![
                "The definition file must contain a single JSON object".into(),
                "Validate it with a JSON linter before converting".into(),
            ],
            Self::UndefinedVariable { name } => vec![
                format!("The template uses '<%= {} %>' but nothing provides it", name),
                "Check the template directory matches this version of appconvert".into(),
            ],
            Self::MissingRequiredField { field } => vec![
                format!("Provide a value for '{}'", field),
                "Pass --title or an app info file with a title".into(),
            ],
            Self::DuplicateOutputPath { .. } => vec![
                "Step keys of one category must differ after snake_casing".into(),
                "Rename one of the steps (e.g. 'newItem' and 'new_item' collide)".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDefinition { .. } | Self::MalformedDefinition(_) => {
                ErrorCategory::Serialization
            }
            Self::UndefinedVariable { .. }
            | Self::MalformedTemplate(_)
            | Self::UnformattableOutput { .. } => ErrorCategory::Template,
            Self::PathOutsideProject { .. }
            | Self::MissingRequiredField { .. }
            | Self::DuplicateOutputPath { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    Serialization,
}
