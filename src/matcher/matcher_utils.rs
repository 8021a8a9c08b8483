use super::control_expression_parser::{ControlExpressionParser, DefaultControlExpressionParser};
use crate::config::MatcherSettings;
use crate::context::TestContext;
use crate::error::MatcherError;
use log::debug;

/// Resolves validation matcher expressions such as `@matches('[0-9]+')@` or
/// `@custom:between('1','10')@` and runs the selected matcher.
pub struct ValidationMatcherUtils;

impl ValidationMatcherUtils {
    /// Resolve `expression` through the context's matcher registry and validate
    /// `field_value` with it.
    ///
    /// Resolution errors (missing body, unknown prefix or matcher, malformed
    /// parameters) abort immediately. A mismatch comes back as
    /// [`MatcherError::Validation`].
    pub fn resolve_validation_matcher(
        field_name: &str,
        field_value: &str,
        expression: &str,
        context: &mut TestContext,
    ) -> Result<(), MatcherError> {
        let settings = context.settings().clone();
        let without_variable = context.cut_off_variables_prefix(expression.trim());
        let mut expression = Self::cut_off_validation_matchers_prefix(without_variable, &settings)
            .trim()
            .to_string();

        if expression == "ignore" {
            expression.push_str("()");
        }

        let body_start = expression
            .find('(')
            .ok_or_else(|| MatcherError::MissingFunctionBody(expression.clone()))?;

        if !expression.ends_with(')') {
            return Err(MatcherError::MissingFunctionBody(expression.clone()));
        }

        let prefix = match expression.find(':') {
            Some(colon) if colon < body_start => &expression[..=colon],
            _ => "",
        };
        let matcher_name = &expression[prefix.len()..body_start];
        let body = &expression[body_start + 1..expression.len() - 1];

        let matcher = context
            .validation_matcher_registry()
            .get_library_for_prefix(prefix)?
            .get_validation_matcher(matcher_name)?;

        let parameters = match matcher.control_expression_parser() {
            Some(parser) => parser.extract_control_values(body, None)?,
            None => DefaultControlExpressionParser.extract_control_values(body, Some(settings.default_delimiter))?,
        };
        let parameters = Self::replace_variables_and_functions_in_parameters(&parameters, context)?;

        debug!(
            "Validating field '{}' with matcher '{}{}' and parameters {:?}",
            field_name, prefix, matcher_name, parameters
        );

        matcher.validate(field_name, field_value, &parameters, context)
    }

    /// True when `expression` is wrapped in the matcher prefix and suffix markers
    pub fn is_validation_matcher_expression(expression: &str, settings: &MatcherSettings) -> bool {
        let prefix = settings.validation_matcher_prefix.as_str();
        let suffix = settings.validation_matcher_suffix.as_str();

        expression.len() >= prefix.len() + suffix.len()
            && expression.starts_with(prefix)
            && expression.ends_with(suffix)
    }

    /// Strip the matcher markers, no-op when they are absent
    pub fn cut_off_validation_matchers_prefix<'a>(expression: &'a str, settings: &MatcherSettings) -> &'a str {
        if Self::is_validation_matcher_expression(expression, settings) {
            &expression[settings.validation_matcher_prefix.len()
                ..expression.len() - settings.validation_matcher_suffix.len()]
        } else {
            expression
        }
    }

    /// Variables are replaced first, functions second, each exactly once
    pub fn replace_variables_and_functions_in_parameters(
        parameters: &[String],
        context: &TestContext,
    ) -> Result<Vec<String>, MatcherError> {
        parameters
            .iter()
            .map(|parameter| {
                let with_variables = context.replace_variables_in_string(parameter)?;
                context.replace_functions_in_string(&with_variables)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_validation_matcher_expression() {
        let settings = MatcherSettings::default();
        assert!(ValidationMatcherUtils::is_validation_matcher_expression("@matches('x')@", &settings));
        assert!(ValidationMatcherUtils::is_validation_matcher_expression("@ignore@", &settings));
        assert!(!ValidationMatcherUtils::is_validation_matcher_expression("matches('x')", &settings));
        assert!(!ValidationMatcherUtils::is_validation_matcher_expression("@matches('x')", &settings));
        assert!(!ValidationMatcherUtils::is_validation_matcher_expression("@", &settings));
    }

    #[test]
    fn test_cut_off_markers() {
        let settings = MatcherSettings::default();
        assert_eq!(
            ValidationMatcherUtils::cut_off_validation_matchers_prefix("@contains('a')@", &settings),
            "contains('a')"
        );
        assert_eq!(
            ValidationMatcherUtils::cut_off_validation_matchers_prefix("contains('a')", &settings),
            "contains('a')"
        );
    }

    #[test]
    fn test_resolve_matching_value() {
        let mut context = TestContext::new();
        assert!(ValidationMatcherUtils::resolve_validation_matcher("id", "123", "@matches('[0-9]+')@", &mut context).is_ok());
        assert!(ValidationMatcherUtils::resolve_validation_matcher("id", "123", "matches('[0-9]+')", &mut context).is_ok());
    }

    #[test]
    fn test_resolve_mismatch() {
        let mut context = TestContext::new();
        let error = ValidationMatcherUtils::resolve_validation_matcher("id", "abc", "@matches('[0-9]+')@", &mut context)
            .unwrap_err();
        let failure = error.validation_error().unwrap();
        assert_eq!(failure.field, "id");
        assert_eq!(failure.actual, "abc");
        assert!(error.to_string().contains("[0-9]+"));
    }

    #[test]
    fn test_missing_body() {
        let mut context = TestContext::new();
        let result = ValidationMatcherUtils::resolve_validation_matcher("id", "x", "@contains@", &mut context);
        assert_eq!(result, Err(MatcherError::MissingFunctionBody("contains".to_string())));

        let result = ValidationMatcherUtils::resolve_validation_matcher("id", "x", "@contains('x'@", &mut context);
        assert!(matches!(result, Err(MatcherError::MissingFunctionBody(_))));
    }

    #[test]
    fn test_bare_ignore() {
        let mut context = TestContext::new();
        assert!(ValidationMatcherUtils::resolve_validation_matcher("any", "whatever", "@ignore@", &mut context).is_ok());
        assert!(ValidationMatcherUtils::resolve_validation_matcher("any", "", "ignore", &mut context).is_ok());
    }

    #[test]
    fn test_parameter_substitution_order() {
        let mut context = TestContext::new();
        context.set_variable("pattern", "core:upperCase('abc')").unwrap();
        let parameters = ValidationMatcherUtils::replace_variables_and_functions_in_parameters(
            &["${pattern}".to_string(), "core:concat('$', '{pattern}')".to_string()],
            &context,
        )
        .unwrap();
        assert_eq!(parameters, vec!["ABC".to_string(), "${pattern}".to_string()]);
    }
}
