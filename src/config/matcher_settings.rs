use crate::error::MatcherError;
use serde::{Deserialize, Serialize};

/// Markers and defaults used when resolving validation matcher expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatcherSettings {
    /// Marker opening a validation matcher expression (Default: "@")
    pub validation_matcher_prefix: String,

    /// Marker closing a validation matcher expression (Default: "@")
    pub validation_matcher_suffix: String,

    /// Marker opening a variable reference (Default: "${")
    pub variable_prefix: String,

    /// Marker closing a variable reference (Default: "}")
    pub variable_suffix: String,

    /// Parameter delimiter for control expressions (Default: ')
    pub default_delimiter: char,

    /// Java style date pattern used by date matchers without explicit format (Default: dd-MM-yyyy)
    pub default_date_format: String,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            validation_matcher_prefix: "@".to_string(),
            validation_matcher_suffix: "@".to_string(),
            variable_prefix: "${".to_string(),
            variable_suffix: "}".to_string(),
            default_delimiter: '\'',
            default_date_format: "dd-MM-yyyy".to_string(),
        }
    }
}

impl MatcherSettings {
    /// Create settings with all default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings using the ISO date format and double-character matcher markers,
    /// which avoids collisions with '@' in e-mail addresses
    pub fn strict() -> Self {
        Self {
            validation_matcher_prefix: "@@".to_string(),
            validation_matcher_suffix: "@@".to_string(),
            default_date_format: "yyyy-MM-dd".to_string(),
            ..Self::default()
        }
    }

    /// Parse settings from JSON, missing keys fall back to defaults
    pub fn from_json(json_str: &str) -> Result<Self, MatcherError> {
        let settings: MatcherSettings = serde_json::from_str(json_str)?;
        settings.validate().map_err(MatcherError::Manifest)?;
        Ok(settings)
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.validation_matcher_prefix.is_empty() {
            return Err("validation_matcher_prefix must not be empty".to_string());
        }

        if self.validation_matcher_suffix.is_empty() {
            return Err("validation_matcher_suffix must not be empty".to_string());
        }

        if self.variable_prefix.is_empty() || self.variable_suffix.is_empty() {
            return Err("variable_prefix and variable_suffix must not be empty".to_string());
        }

        if self.default_delimiter.is_whitespace()
            || matches!(self.default_delimiter, ',' | '(' | ')')
        {
            return Err(format!(
                "default_delimiter '{}' collides with control expression syntax",
                self.default_delimiter
            ));
        }

        if self.default_date_format.trim().is_empty() {
            return Err("default_date_format must not be empty".to_string());
        }

        Ok(())
    }
}
