use super::control_value;
use crate::context::TestContext;
use crate::error::{MatcherError, ValidationError};
use crate::matcher::ValidationMatcher;
use crate::utils::DatePattern;
use regex::Regex;

/// The whole value must match a regular expression
pub struct MatchesValidationMatcher;

impl ValidationMatcher for MatchesValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, control: &[String], _context: &mut TestContext) -> Result<(), MatcherError> {
        let pattern = control_value(self.name(), control, 0)?;
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;

        if regex.is_match(value) {
            Ok(())
        } else {
            Err(ValidationError::mismatch(self.name(), field_name, value, control).into())
        }
    }

    fn name(&self) -> &str {
        "matches"
    }
}

/// Value parses with a Java style date pattern such as `yyyy-MM-dd`
pub struct MatchesDatePatternValidationMatcher;

impl ValidationMatcher for MatchesDatePatternValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, control: &[String], _context: &mut TestContext) -> Result<(), MatcherError> {
        let pattern = control_value(self.name(), control, 0)?;
        let format = DatePattern::to_chrono_format(pattern)
            .map_err(|e| MatcherError::invalid_parameter(self.name(), e.to_string()))?;

        if DatePattern::parse_formatted(value, &format).is_some() {
            Ok(())
        } else {
            Err(ValidationError::mismatch(self.name(), field_name, value, control).into())
        }
    }

    fn name(&self) -> &str {
        "matchesDatePattern"
    }
}

/// Value is a finite decimal number
pub struct IsNumberValidationMatcher;

impl ValidationMatcher for IsNumberValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, _control: &[String], _context: &mut TestContext) -> Result<(), MatcherError> {
        match value.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(()),
            _ => Err(ValidationError::new(
                field_name,
                value,
                format!(
                    "{} failed for field '{}'. Received value '{}' is not a number.",
                    self.name(),
                    field_name,
                    value
                ),
            )
            .into()),
        }
    }

    fn name(&self) -> &str {
        "isNumber"
    }
}
