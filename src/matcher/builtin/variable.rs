use crate::context::TestContext;
use crate::error::MatcherError;
use crate::matcher::ValidationMatcher;
use log::debug;

/// Stores the received value as a test variable. Never fails validation.
///
/// `variable()` uses the field name as variable name, `variable('name')`
/// the given one.
pub struct CreateVariableValidationMatcher;

impl ValidationMatcher for CreateVariableValidationMatcher {
    fn validate(&self, field_name: &str, value: &str, control: &[String], context: &mut TestContext) -> Result<(), MatcherError> {
        let name = control
            .first()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or(field_name);

        debug!("Setting variable '{}' to value of field '{}'", name, field_name);
        context.set_variable(name, value)
    }

    fn name(&self) -> &str {
        "variable"
    }
}
