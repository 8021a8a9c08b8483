use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::validation_error::ValidationError;

/// Broad category of a matcher error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Malformed expressions, unknown libraries or matchers, bad settings.
    /// Fatal for the current validation step and never retried.
    Configuration,

    /// The received value did not satisfy the matcher
    Validation,
}

impl ErrorCategory {
    /// Returns the string representation of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "CONFIGURATION_ERROR",
            ErrorCategory::Validation => "VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatcherError {
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Validation matcher library with prefix '{prefix}' is already registered ({existing})")]
    DuplicatePrefix { prefix: String, existing: String },

    #[error("Illegal syntax for validation matcher expression '{0}' - missing validation value in '()' function body")]
    MissingFunctionBody(String),

    #[error("No matching delimiter ({delimiter}) found after position '{position}' in control expression: {expression}")]
    UnmatchedDelimiter {
        delimiter: char,
        position: usize,
        expression: String,
    },

    #[error("Can not find validation matcher library for prefix '{prefix}'")]
    NoSuchLibrary { prefix: String },

    #[error("Can not find validation matcher '{name}' in library '{library}'")]
    NoSuchMatcher { name: String, library: String },

    #[error("Function library with prefix '{0}' is already registered")]
    DuplicateFunctionPrefix(String),

    #[error("Can not find function '{name}' in library '{library}'")]
    NoSuchFunction { name: String, library: String },

    #[error("Illegal function call '{0}'")]
    InvalidFunctionCall(String),

    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("Invalid variable name '{0}'")]
    InvalidVariableName(String),

    #[error("Invalid control parameter for '{matcher}': {details}")]
    InvalidParameter { matcher: String, details: String },

    #[error("Invalid regular expression: {0}")]
    InvalidPattern(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl MatcherError {
    /// Category of this error
    pub fn kind(&self) -> ErrorCategory {
        match self {
            MatcherError::Validation(_) => ErrorCategory::Validation,
            _ => ErrorCategory::Configuration,
        }
    }

    /// Returns true for per-field validation failures
    pub fn is_validation_failure(&self) -> bool {
        self.kind() == ErrorCategory::Validation
    }

    /// Short error code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            MatcherError::Validation(_) => "VALIDATION_FAILED",
            MatcherError::DuplicatePrefix { .. } => "DUPLICATE_PREFIX",
            MatcherError::MissingFunctionBody(_) => "MISSING_FUNCTION_BODY",
            MatcherError::UnmatchedDelimiter { .. } => "UNMATCHED_DELIMITER",
            MatcherError::NoSuchLibrary { .. } => "NO_SUCH_LIBRARY",
            MatcherError::NoSuchMatcher { .. } => "NO_SUCH_MATCHER",
            MatcherError::DuplicateFunctionPrefix(_) => "DUPLICATE_FUNCTION_PREFIX",
            MatcherError::NoSuchFunction { .. } => "NO_SUCH_FUNCTION",
            MatcherError::InvalidFunctionCall(_) => "INVALID_FUNCTION_CALL",
            MatcherError::UnknownVariable(_) => "UNKNOWN_VARIABLE",
            MatcherError::InvalidVariableName(_) => "INVALID_VARIABLE_NAME",
            MatcherError::InvalidParameter { .. } => "INVALID_PARAMETER",
            MatcherError::InvalidPattern(_) => "INVALID_PATTERN",
            MatcherError::Manifest(_) => "MANIFEST_ERROR",
            MatcherError::Io(_) => "IO_ERROR",
        }
    }

    /// Shortcut for an invalid control parameter
    pub fn invalid_parameter<M: Into<String>, D: Into<String>>(matcher: M, details: D) -> Self {
        MatcherError::InvalidParameter {
            matcher: matcher.into(),
            details: details.into(),
        }
    }

    /// The validation failure carried by this error, if any
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            MatcherError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for MatcherError {
    fn from(error: ValidationError) -> Self {
        MatcherError::Validation(error)
    }
}

impl From<regex::Error> for MatcherError {
    fn from(error: regex::Error) -> Self {
        MatcherError::InvalidPattern(error.to_string())
    }
}

impl From<serde_json::Error> for MatcherError {
    fn from(error: serde_json::Error) -> Self {
        MatcherError::Manifest(error.to_string())
    }
}

impl From<std::io::Error> for MatcherError {
    fn from(error: std::io::Error) -> Self {
        MatcherError::Io(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let failure = MatcherError::Validation(ValidationError::new("foo", "abc", "did not match"));
        assert_eq!(failure.kind(), ErrorCategory::Validation);
        assert!(failure.is_validation_failure());

        let missing = MatcherError::NoSuchLibrary { prefix: "myLib:".to_string() };
        assert_eq!(missing.kind(), ErrorCategory::Configuration);
        assert_eq!(missing.code(), "NO_SUCH_LIBRARY");
        assert!(missing.validation_error().is_none());
    }

    #[test]
    fn test_error_messages() {
        let error = MatcherError::UnmatchedDelimiter {
            delimiter: '\'',
            position: 4,
            expression: "'a','b".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No matching delimiter (') found after position '4' in control expression: 'a','b"
        );

        let error = MatcherError::NoSuchLibrary { prefix: "myLib:".to_string() };
        assert!(error.to_string().contains("myLib:"));
    }

    #[test]
    fn test_regex_conversion() {
        let error: MatcherError = regex::Regex::new("[0-9").unwrap_err().into();
        assert_eq!(error.code(), "INVALID_PATTERN");
    }
}
