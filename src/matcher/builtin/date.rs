use super::control_value;
use crate::context::TestContext;
use crate::error::{MatcherError, ValidationError};
use crate::matcher::{ControlParameters, ValidationMatcher};
use crate::utils::DatePattern;
use chrono::{Datelike, NaiveDateTime, Weekday};

/// Default pattern for `isWeekday` when none is given
pub const WEEKDAY_DATE_FORMAT: &str = "dd.MM.yyyy";

/// Typed parameters of `dateRange(from, to[, pattern])`
#[derive(Debug, Clone, PartialEq)]
pub struct DateRangeParameters {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub pattern: String,
    format: String,
}

impl DateRangeParameters {
    /// chrono format translated from `pattern`
    pub fn format(&self) -> &str {
        &self.format
    }
}

impl ControlParameters for DateRangeParameters {
    fn configure(parameters: &[String], context: &TestContext) -> Result<Self, MatcherError> {
        if parameters.len() < 2 {
            return Err(MatcherError::invalid_parameter(
                "dateRange",
                format!("expected from and to dates, got {} parameter(s)", parameters.len()),
            ));
        }

        let pattern = parameters
            .get(2)
            .map(|p| p.trim().to_string())
            .unwrap_or_else(|| context.settings().default_date_format.clone());

        let format = DatePattern::to_chrono_format(&pattern)
            .map_err(|e| MatcherError::invalid_parameter("dateRange", e.to_string()))?;

        let bound = |raw: &str| {
            DatePattern::parse_formatted(raw.trim(), &format).ok_or_else(|| {
                MatcherError::invalid_parameter(
                    "dateRange",
                    format!("'{}' does not match date pattern '{}'", raw, pattern),
                )
            })
        };

        let from = bound(&parameters[0])?;
        let to = bound(&parameters[1])?;

        if from > to {
            return Err(MatcherError::invalid_parameter(
                "dateRange",
                format!("range start '{}' is after range end '{}'", parameters[0], parameters[1]),
            ));
        }

        Ok(Self { from, to, pattern, format })
    }
}

/// Date lies within `[from, to]`, bounds included
pub struct DateRangeValidationMatcher;

impl ValidationMatcher for DateRangeValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, control: &[String], context: &mut TestContext) -> Result<(), MatcherError> {
        let range = DateRangeParameters::configure(control, context)?;

        match DatePattern::parse_formatted(value.trim(), range.format()) {
            Some(date) if date >= range.from && date <= range.to => Ok(()),
            Some(_) => Err(ValidationError::new(
                field_name,
                value,
                format!(
                    "{} failed for field '{}'. Date '{}' is not within range '{}' - '{}'.",
                    self.name(),
                    field_name,
                    value,
                    control[0],
                    control[1]
                ),
            )
            .with_expected(control.to_vec())
            .into()),
            None => Err(ValidationError::new(
                field_name,
                value,
                format!(
                    "{} failed for field '{}'. Received value '{}' does not match date pattern '{}'.",
                    self.name(),
                    field_name,
                    value,
                    range.pattern
                ),
            )
            .with_expected(control.to_vec())
            .into()),
        }
    }

    fn name(&self) -> &str {
        "dateRange"
    }
}

/// Date falls on the given weekday, `isWeekday('MONDAY'[, pattern])`
pub struct WeekdayValidationMatcher;

impl ValidationMatcher for WeekdayValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, control: &[String], _context: &mut TestContext) -> Result<(), MatcherError> {
        let raw_weekday = control_value(self.name(), control, 0)?;
        let weekday: Weekday = raw_weekday
            .trim()
            .parse()
            .map_err(|_| MatcherError::invalid_parameter(self.name(), format!("unknown weekday '{}'", raw_weekday)))?;

        let pattern = control.get(1).map(|p| p.trim()).unwrap_or(WEEKDAY_DATE_FORMAT);
        let format = DatePattern::to_chrono_format(pattern)
            .map_err(|e| MatcherError::invalid_parameter(self.name(), e.to_string()))?;

        match DatePattern::parse_formatted(value.trim(), &format) {
            Some(date) if date.weekday() == weekday => Ok(()),
            _ => Err(ValidationError::new(
                field_name,
                value,
                format!(
                    "{} failed for field '{}'. Received value '{}' is not a {}.",
                    self.name(),
                    field_name,
                    value,
                    raw_weekday.trim().to_uppercase()
                ),
            )
            .with_expected(control.to_vec())
            .into()),
        }
    }

    fn name(&self) -> &str {
        "isWeekday"
    }
}
