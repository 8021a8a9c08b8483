use super::control_value;
use crate::context::TestContext;
use crate::error::{MatcherError, ValidationError};
use crate::matcher::ValidationMatcher;
use std::cmp::Ordering;

/// Parse a control value as a number, a bad control value is a configuration error
fn control_number(matcher: &str, raw: &str) -> Result<f64, MatcherError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| MatcherError::invalid_parameter(matcher, format!("'{}' is not a number", raw)))
}

/// Compare value and control value numerically. A non-numeric value fails validation.
fn compare(
    matcher: &str,
    field_name: &str,
    value: &str,
    control: &[String],
    expected: Ordering,
) -> Result<(), MatcherError> {
    let limit = control_number(matcher, control_value(matcher, control, 0)?)?;

    let ordering = value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|number| number.partial_cmp(&limit));

    if ordering == Some(expected) {
        Ok(())
    } else {
        Err(ValidationError::mismatch(matcher, field_name, value, control).into())
    }
}

/// Value is strictly greater than the control value
pub struct GreaterThanValidationMatcher;

impl ValidationMatcher for GreaterThanValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, control: &[String], _context: &mut TestContext) -> Result<(), MatcherError> {
        compare(self.name(), field_name, value, control, Ordering::Greater)
    }

    fn name(&self) -> &str {
        "greaterThan"
    }
}

/// Value is strictly lower than the control value
pub struct LowerThanValidationMatcher;

impl ValidationMatcher for LowerThanValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, control: &[String], _context: &mut TestContext) -> Result<(), MatcherError> {
        compare(self.name(), field_name, value, control, Ordering::Less)
    }

    fn name(&self) -> &str {
        "lowerThan"
    }
}
