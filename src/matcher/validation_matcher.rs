//! Core validation matcher traits

use super::control_expression_parser::ControlExpressionParser;
use crate::context::TestContext;
use crate::error::MatcherError;

/// Single-value validation rule.
///
/// Implementations are stateless and shared between threads as
/// `Arc<dyn ValidationMatcher>`. A mismatch is reported as
/// [`MatcherError::Validation`]; any other error means the matcher could not
/// be applied (bad parameters and the like).
pub trait ValidationMatcher: Send + Sync {
    /// Validate `value` of `field_name` against the control parameters
    fn validate(
        &self,
        field_name: &str,
        value: &str,
        control_parameters: &[String],
        context: &mut TestContext,
    ) -> Result<(), MatcherError>;

    /// Name used in failure messages
    fn name(&self) -> &str;

    /// Matchers that parse their own control expression return a parser here,
    /// everyone else gets the default parser
    fn control_expression_parser(&self) -> Option<&dyn ControlExpressionParser> {
        None
    }
}

/// Typed view on the raw control parameters of a matcher.
///
/// Built from the already substituted string parameters plus the active test
/// context, so matchers can work with dates, ranges or numbers while the
/// expression syntax stays string based.
pub trait ControlParameters: Sized {
    fn configure(control_parameters: &[String], context: &TestContext) -> Result<Self, MatcherError>;
}
