use serde::{Deserialize, Serialize};

/// A failed match with enough context to report it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,

    /// Received value
    pub actual: String,

    /// Control value(s) the received value was checked against
    pub expected: Vec<String>,

    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a validation error without control values
    pub fn new<F: Into<String>, A: Into<String>, M: Into<String>>(field: F, actual: A, message: M) -> Self {
        Self {
            field: field.into(),
            actual: actual.into(),
            expected: Vec::new(),
            message: message.into(),
        }
    }

    /// Standard mismatch report used by the built-in matchers:
    /// `<matcher> failed for field '<field>'. Received value is '<value>', control value is '<control>'.`
    pub fn mismatch(matcher: &str, field: &str, actual: &str, control: &[String]) -> Self {
        let control_text = control.join("', '");
        Self {
            field: field.to_string(),
            actual: actual.to_string(),
            expected: control.to_vec(),
            message: format!(
                "{} failed for field '{}'. Received value is '{}', control value is '{}'.",
                matcher, field, actual, control_text
            ),
        }
    }

    /// Attach control values
    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}
