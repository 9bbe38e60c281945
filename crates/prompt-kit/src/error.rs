//! Error types for prompt operations

use std::fmt;
use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Broad classification of a [`PromptError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Parameters or template definition are not acceptable
    Validation,
    /// An input value was rejected by the sanitizer
    Sanitization,
    /// Duplicate or unknown template name
    Registry,
    /// A persisted document could not be read or written
    Persistence,
}

/// A single problem found while checking parameters against a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Required placeholders with no supplied value
    MissingParameters(Vec<String>),
    /// Supplied values with no matching placeholder
    UnexpectedParameters(Vec<String>),
    /// A value whose runtime type differs from the declared type
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    /// A placeholder reached during substitution had no value
    UnresolvedPlaceholder(String),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameters(names) => {
                write!(f, "missing required parameters: {}", names.join(", "))
            }
            Self::UnexpectedParameters(names) => {
                write!(f, "unexpected parameters: {}", names.join(", "))
            }
            Self::TypeMismatch {
                name,
                expected,
                actual,
            } => write!(f, "parameter '{name}' should be {expected}, got {actual}"),
            Self::UnresolvedPlaceholder(name) => {
                write!(f, "missing parameter for rendering: {name}")
            }
        }
    }
}

/// Reason a value was rejected by the sanitizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizationIssue {
    /// A catalog pattern matched
    DangerousPattern(String),
    /// Input is longer than the configured limit (in characters)
    TooLong { length: usize, max_length: usize },
    /// Input was not a string
    NotAString(String),
}

impl fmt::Display for SanitizationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DangerousPattern(pattern) => {
                write!(f, "potentially dangerous content detected ({pattern})")
            }
            Self::TooLong { length, max_length } => write!(
                f,
                "input exceeds maximum length of {max_length} characters (got {length})"
            ),
            Self::NotAString(actual) => write!(f, "input must be string, got {actual}"),
        }
    }
}

/// Errors that can occur during prompt operations
#[derive(Error, Debug)]
pub enum PromptError {
    /// Parameters did not satisfy the template contract
    #[error("Validation failed for template '{template}': {}", join_issues(.issues))]
    Validation {
        template: String,
        issues: Vec<ValidationIssue>,
    },

    /// Template definition is malformed
    #[error("Invalid template '{name}': {detail}")]
    InvalidTemplate { name: String, detail: String },

    /// Category string outside the closed set
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    /// Declared parameter type name not recognised
    #[error("Unknown parameter type '{0}'")]
    UnknownParameterType(String),

    /// Sanitizer rejected a value
    #[error("Sanitization failed for {subject}: {issue}")]
    Sanitization {
        subject: String,
        issue: SanitizationIssue,
    },

    /// Custom sanitizer pattern failed to compile
    #[error("Invalid sanitizer pattern '{name}': {detail}")]
    InvalidPattern { name: String, detail: String },

    /// Template name already present in the registry
    #[error("Template '{0}' already registered")]
    DuplicateTemplate(String),

    /// Template not registered in registry
    #[error("Template '{0}' not registered")]
    TemplateNotRegistered(String),

    /// Persisted document could not be read, parsed, or written
    #[error("Failed to access template document '{location}': {detail}")]
    Persistence { location: String, detail: String },

    /// Configuration value out of range
    #[error("Configuration error: {0}")]
    Config(String),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl PromptError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. }
            | Self::InvalidTemplate { .. }
            | Self::UnknownCategory(_)
            | Self::UnknownParameterType(_)
            | Self::Config(_) => ErrorKind::Validation,
            Self::Sanitization { .. } | Self::InvalidPattern { .. } => ErrorKind::Sanitization,
            Self::DuplicateTemplate(_) | Self::TemplateNotRegistered(_) => ErrorKind::Registry,
            Self::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    /// Validation issues carried by this error, if any
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation { issues, .. } => issues,
            _ => &[],
        }
    }

    pub(crate) fn persistence(location: impl fmt::Display, detail: impl fmt::Display) -> Self {
        Self::Persistence {
            location: location.to_string(),
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_joins_issues() {
        let err = PromptError::Validation {
            template: "greeting".to_string(),
            issues: vec![
                ValidationIssue::MissingParameters(vec!["task".to_string()]),
                ValidationIssue::UnexpectedParameters(vec!["extra".to_string()]),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Validation failed for template 'greeting': missing required parameters: task; \
             unexpected parameters: extra"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_type_mismatch_message() {
        let issue = ValidationIssue::TypeMismatch {
            name: "count".to_string(),
            expected: "integer".to_string(),
            actual: "string".to_string(),
        };
        assert_eq!(issue.to_string(), "parameter 'count' should be integer, got string");
    }

    #[test]
    fn test_sanitization_display() {
        let err = PromptError::Sanitization {
            subject: "parameter 'topic'".to_string(),
            issue: SanitizationIssue::TooLong {
                length: 12,
                max_length: 10,
            },
        };
        assert_eq!(
            err.to_string(),
            "Sanitization failed for parameter 'topic': input exceeds maximum length of 10 \
             characters (got 12)"
        );
        assert_eq!(err.kind(), ErrorKind::Sanitization);
        assert!(err.issues().is_empty());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            PromptError::DuplicateTemplate("a".into()).kind(),
            ErrorKind::Registry
        );
        assert_eq!(
            PromptError::TemplateNotRegistered("a".into()).kind(),
            ErrorKind::Registry
        );
        assert_eq!(
            PromptError::persistence("a.json", "bad").kind(),
            ErrorKind::Persistence
        );
        assert_eq!(
            PromptError::UnknownCategory("x".into()).kind(),
            ErrorKind::Validation
        );
    }
}
