//! String comparison matchers

use super::control_value;
use crate::context::TestContext;
use crate::error::{MatcherError, ValidationError};
use crate::matcher::ValidationMatcher;
use regex::Regex;

/// Accepts any value
pub struct IgnoreValidationMatcher;

impl ValidationMatcher for IgnoreValidationMatcher {
    fn validate(&self, field_name: &str, _value: &str, _control: &[String], _context: &mut TestContext) -> Result<(), MatcherError> {
        log::debug!("Ignoring value of field '{}'", field_name);
        Ok(())
    }

    fn name(&self) -> &str {
        "ignore"
    }
}

/// Generates a matcher that compares the value with the first control
/// parameter using `$check(value, control)`
macro_rules! comparison_matcher {
    ($(#[$doc:meta])* $type:ident, $name:literal, $check:expr) => {
        $(#[$doc])*
        pub struct $type;

        impl ValidationMatcher for $type {
            fn validate(
                &self,
                field_name: &str,
                value: &str,
                control: &[String],
                _context: &mut TestContext,
            ) -> Result<(), MatcherError> {
                let control_value = control_value(self.name(), control, 0)?;
                let check: fn(&str, &str) -> bool = $check;
                if check(value, control_value) {
                    Ok(())
                } else {
                    Err(ValidationError::mismatch(self.name(), field_name, value, control).into())
                }
            }

            fn name(&self) -> &str {
                $name
            }
        }
    };
}

comparison_matcher!(
    /// Case-insensitive equality
    EqualsIgnoreCaseValidationMatcher,
    "equalsIgnoreCase",
    |value, control| value.to_lowercase() == control.to_lowercase()
);

comparison_matcher!(ContainsValidationMatcher, "contains", |value, control| value.contains(control));

comparison_matcher!(
    ContainsIgnoreCaseValidationMatcher,
    "containsIgnoreCase",
    |value, control| value.to_lowercase().contains(&control.to_lowercase())
);

comparison_matcher!(StartsWithValidationMatcher, "startsWith", |value, control| value.starts_with(control));

comparison_matcher!(EndsWithValidationMatcher, "endsWith", |value, control| value.ends_with(control));

comparison_matcher!(
    /// Equality after trimming leading and trailing whitespace on both sides
    TrimValidationMatcher,
    "trim",
    |value, control| value.trim() == control.trim()
);

comparison_matcher!(
    /// Equality after removing every whitespace character
    TrimAllWhitespacesValidationMatcher,
    "trimAllWhitespaces",
    |value, control| strip_whitespace(value) == strip_whitespace(control)
);

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Equality ignoring line breaks and the indentation around them
pub struct IgnoreNewLineValidationMatcher;

impl ValidationMatcher for IgnoreNewLineValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, control: &[String], _context: &mut TestContext) -> Result<(), MatcherError> {
        let control_value = control_value(self.name(), control, 0)?;
        let line_breaks = Regex::new(r"\s*[\r\n]+\s*")?;

        if line_breaks.replace_all(value, "") == line_breaks.replace_all(control_value, "") {
            Ok(())
        } else {
            Err(ValidationError::mismatch(self.name(), field_name, value, control).into())
        }
    }

    fn name(&self) -> &str {
        "ignoreNewLine"
    }
}

/// Character count equals the control value
pub struct StringLengthValidationMatcher;

impl ValidationMatcher for StringLengthValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, control: &[String], _context: &mut TestContext) -> Result<(), MatcherError> {
        let raw = control_value(self.name(), control, 0)?;
        let expected: usize = raw.trim().parse().map_err(|_| {
            MatcherError::invalid_parameter(self.name(), format!("'{}' is not a valid length", raw))
        })?;

        let length = value.chars().count();
        if length == expected {
            Ok(())
        } else {
            Err(ValidationError::new(
                field_name,
                value,
                format!(
                    "{} failed for field '{}'. Received value '{}' has length {}, expected {}.",
                    self.name(),
                    field_name,
                    value,
                    length,
                    expected
                ),
            )
            .with_expected(control.to_vec())
            .into())
        }
    }

    fn name(&self) -> &str {
        "stringLength"
    }
}

/// Generates a matcher without control parameters
macro_rules! predicate_matcher {
    ($type:ident, $name:literal, $expectation:literal, $check:expr) => {
        pub struct $type;

        impl ValidationMatcher for $type {
            fn validate(
                &self,
                field_name: &str,
                value: &str,
                _control: &[String],
                _context: &mut TestContext,
            ) -> Result<(), MatcherError> {
                let check: fn(&str) -> bool = $check;
                if check(value) {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        field_name,
                        value,
                        format!(
                            "{} failed for field '{}'. Received value is '{}', expected {}.",
                            $name, field_name, value, $expectation
                        ),
                    )
                    .into())
                }
            }

            fn name(&self) -> &str {
                $name
            }
        }
    };
}

predicate_matcher!(EmptyValidationMatcher, "empty", "an empty value", |value| value.is_empty());
predicate_matcher!(NotEmptyValidationMatcher, "notEmpty", "a non-empty value", |value| !value.is_empty());
predicate_matcher!(NullValidationMatcher, "null", "null", |value| value.eq_ignore_ascii_case("null"));
predicate_matcher!(NotNullValidationMatcher, "notNull", "a non-null value", |value| !value.eq_ignore_ascii_case("null"));
