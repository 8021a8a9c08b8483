//! Matchers of the standard library

pub mod date;
pub mod hamcrest;
pub mod numeric;
pub mod pattern;
pub mod text;
pub mod variable;

pub use date::{DateRangeParameters, DateRangeValidationMatcher, WeekdayValidationMatcher};
pub use hamcrest::{HamcrestExpressionParser, HamcrestMatcherProvider, HamcrestValidationMatcher, PathMatcherProvider};
pub use numeric::{GreaterThanValidationMatcher, LowerThanValidationMatcher};
pub use pattern::{IsNumberValidationMatcher, MatchesDatePatternValidationMatcher, MatchesValidationMatcher};
pub use text::{
    ContainsIgnoreCaseValidationMatcher, ContainsValidationMatcher, EmptyValidationMatcher,
    EndsWithValidationMatcher, EqualsIgnoreCaseValidationMatcher, IgnoreNewLineValidationMatcher,
    IgnoreValidationMatcher, NotEmptyValidationMatcher, NotNullValidationMatcher, NullValidationMatcher,
    StartsWithValidationMatcher, StringLengthValidationMatcher, TrimAllWhitespacesValidationMatcher,
    TrimValidationMatcher,
};
pub use variable::CreateVariableValidationMatcher;

use super::ValidationMatcher;
use crate::error::MatcherError;
use std::sync::Arc;

/// All built-in matchers keyed by the name they are registered under
pub fn builtin_matchers() -> Vec<(&'static str, Arc<dyn ValidationMatcher>)> {
    vec![
        entry("ignore", IgnoreValidationMatcher),
        entry("equalsIgnoreCase", EqualsIgnoreCaseValidationMatcher),
        entry("contains", ContainsValidationMatcher),
        entry("containsIgnoreCase", ContainsIgnoreCaseValidationMatcher),
        entry("startsWith", StartsWithValidationMatcher),
        entry("endsWith", EndsWithValidationMatcher),
        entry("trim", TrimValidationMatcher),
        entry("trimAllWhitespaces", TrimAllWhitespacesValidationMatcher),
        entry("ignoreNewLine", IgnoreNewLineValidationMatcher),
        entry("stringLength", StringLengthValidationMatcher),
        entry("empty", EmptyValidationMatcher),
        entry("notEmpty", NotEmptyValidationMatcher),
        entry("null", NullValidationMatcher),
        entry("notNull", NotNullValidationMatcher),
        entry("matches", MatchesValidationMatcher),
        entry("matchesDatePattern", MatchesDatePatternValidationMatcher),
        entry("isNumber", IsNumberValidationMatcher),
        entry("greaterThan", GreaterThanValidationMatcher),
        entry("lowerThan", LowerThanValidationMatcher),
        entry("dateRange", DateRangeValidationMatcher),
        entry("isWeekday", WeekdayValidationMatcher),
        entry("variable", CreateVariableValidationMatcher),
        entry("assertThat", HamcrestValidationMatcher::new()),
    ]
}

fn entry<M: ValidationMatcher + 'static>(name: &'static str, matcher: M) -> (&'static str, Arc<dyn ValidationMatcher>) {
    (name, Arc::new(matcher))
}

/// Control parameter at `index` or an invalid parameter error naming the matcher
pub(crate) fn control_value<'a>(matcher: &str, control: &'a [String], index: usize) -> Result<&'a str, MatcherError> {
    control.get(index).map(String::as_str).ok_or_else(|| {
        MatcherError::invalid_parameter(
            matcher,
            format!("missing control value at position {}", index + 1),
        )
    })
}
