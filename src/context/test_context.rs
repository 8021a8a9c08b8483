use crate::config::MatcherSettings;
use crate::error::MatcherError;
use crate::functions::{split_function_parameters, FunctionRegistry};
use crate::matcher::ValidationMatcherRegistry;
use log::debug;
use std::collections::HashMap;

/// State of one executing test: variables, functions, matcher registry and settings.
///
/// Owned by a single test run and not meant for concurrent mutation.
#[derive(Debug, Clone)]
pub struct TestContext {
    variables: HashMap<String, String>,
    function_registry: FunctionRegistry,
    validation_matcher_registry: ValidationMatcherRegistry,
    settings: MatcherSettings,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Context with default settings, the core function library and the
    /// standard validation matcher library
    pub fn new() -> Self {
        Self::with_settings(MatcherSettings::default())
    }

    pub fn with_settings(settings: MatcherSettings) -> Self {
        Self {
            variables: HashMap::new(),
            function_registry: FunctionRegistry::with_core_library(),
            validation_matcher_registry: ValidationMatcherRegistry::with_standard_library(),
            settings,
        }
    }

    /// Replace the matcher registry, e.g. with one built from a library manifest
    pub fn with_validation_matcher_registry(mut self, registry: ValidationMatcherRegistry) -> Self {
        self.validation_matcher_registry = registry;
        self
    }

    pub fn with_function_registry(mut self, registry: FunctionRegistry) -> Self {
        self.function_registry = registry;
        self
    }

    pub fn settings(&self) -> &MatcherSettings {
        &self.settings
    }

    pub fn validation_matcher_registry(&self) -> &ValidationMatcherRegistry {
        &self.validation_matcher_registry
    }

    pub fn validation_matcher_registry_mut(&mut self) -> &mut ValidationMatcherRegistry {
        &mut self.validation_matcher_registry
    }

    pub fn function_registry(&self) -> &FunctionRegistry {
        &self.function_registry
    }

    pub fn function_registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.function_registry
    }

    /// Strip `${` and `}` when the whole expression is a variable reference
    pub fn cut_off_variables_prefix<'a>(&self, expression: &'a str) -> &'a str {
        let prefix = self.settings.variable_prefix.as_str();
        let suffix = self.settings.variable_suffix.as_str();

        if expression.len() >= prefix.len() + suffix.len()
            && expression.starts_with(prefix)
            && expression.ends_with(suffix)
        {
            &expression[prefix.len()..expression.len() - suffix.len()]
        } else {
            expression
        }
    }

    /// Create or overwrite a variable. The name may be given as `${name}`.
    pub fn set_variable<V: Into<String>>(&mut self, name: &str, value: V) -> Result<(), MatcherError> {
        let variable_name = self.cut_off_variables_prefix(name.trim()).to_string();
        if variable_name.trim().is_empty() {
            return Err(MatcherError::InvalidVariableName(name.to_string()));
        }

        let value = value.into();
        debug!("Setting variable: {} with value: '{}'", variable_name, value);
        self.variables.insert(variable_name, value);
        Ok(())
    }

    pub fn get_variable(&self, expression: &str) -> Result<&str, MatcherError> {
        let name = self.cut_off_variables_prefix(expression);
        self.variables
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| MatcherError::UnknownVariable(name.to_string()))
    }

    pub fn has_variable(&self, expression: &str) -> bool {
        self.variables.contains_key(self.cut_off_variables_prefix(expression))
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    /// Replace every `${name}` reference once, left to right. Substituted
    /// values are not scanned again. Unterminated references stay as they are.
    pub fn replace_variables_in_string(&self, input: &str) -> Result<String, MatcherError> {
        let prefix = self.settings.variable_prefix.as_str();
        let suffix = self.settings.variable_suffix.as_str();

        let mut output = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find(prefix) {
            output.push_str(&rest[..start]);
            let after_prefix = &rest[start + prefix.len()..];

            match after_prefix.find(suffix) {
                Some(end) => {
                    let name = &after_prefix[..end];
                    if name.trim().is_empty() {
                        return Err(MatcherError::InvalidVariableName(format!("{}{}", prefix, suffix)));
                    }
                    output.push_str(self.get_variable(name)?);
                    rest = &after_prefix[end + suffix.len()..];
                }
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        output.push_str(rest);
        Ok(output)
    }

    /// Evaluate every `prefix:name(args)` call of the registered function
    /// libraries. Nested calls in arguments are evaluated first; results are
    /// not scanned again.
    pub fn replace_functions_in_string(&self, input: &str) -> Result<String, MatcherError> {
        let mut output = String::with_capacity(input.len());
        let mut index = 0;
        let mut previous: Option<char> = None;

        while let Some(current) = input[index..].chars().next() {
            let at_boundary = !previous.map_or(false, |c| c.is_alphanumeric() || c == '_');

            if at_boundary {
                if let Some((end, value)) = self.evaluate_function_at(input, index)? {
                    output.push_str(&value);
                    previous = input[..end].chars().next_back();
                    index = end;
                    continue;
                }
            }

            output.push(current);
            previous = Some(current);
            index += current.len_utf8();
        }

        Ok(output)
    }

    /// Variables first, then functions
    pub fn replace_dynamic_content(&self, input: &str) -> Result<String, MatcherError> {
        let with_variables = self.replace_variables_in_string(input)?;
        self.replace_functions_in_string(&with_variables)
    }

    /// Evaluates a function call starting at `index`, returning the end offset
    /// and the result. `None` when no call starts there.
    fn evaluate_function_at(&self, input: &str, index: usize) -> Result<Option<(usize, String)>, MatcherError> {
        let remaining = &input[index..];
        let library = match self
            .function_registry
            .libraries()
            .iter()
            .find(|library| remaining.starts_with(library.prefix()))
        {
            Some(library) => library,
            None => return Ok(None),
        };

        let name_start = index + library.prefix().len();
        let name_len = input[name_start..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .count();
        let open = name_start + name_len;

        if name_len == 0 || !input[open..].starts_with('(') {
            return Ok(None);
        }

        let close = find_closing_parenthesis(input, open)
            .ok_or_else(|| MatcherError::InvalidFunctionCall(remaining.to_string()))?;

        let function = library.get_function(&input[name_start..open])?;
        let parameters = split_function_parameters(&input[open + 1..close])
            .iter()
            .map(|parameter| self.replace_functions_in_string(parameter))
            .collect::<Result<Vec<_>, _>>()?;

        let value = function.execute(&parameters, self)?;
        debug!("Function '{}' resolved to '{}'", &input[index..=close], value);

        Ok(Some((close + 1, value)))
    }
}

/// Index of the `)` matching the `(` at `open`, ignoring quoted text
fn find_closing_parenthesis(input: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quoted = false;

    for (offset, c) in input[open..].char_indices() {
        match c {
            '\'' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_variable() {
        let mut context = TestContext::new();
        context.set_variable("greeting", "hello").unwrap();
        context.set_variable("${wrapped}", "value").unwrap();

        assert_eq!(context.get_variable("greeting").unwrap(), "hello");
        assert_eq!(context.get_variable("${greeting}").unwrap(), "hello");
        assert_eq!(context.get_variable("wrapped").unwrap(), "value");
        assert!(context.has_variable("wrapped"));
    }

    #[test]
    fn test_invalid_variable_name() {
        let mut context = TestContext::new();
        assert!(matches!(context.set_variable(" ", "x"), Err(MatcherError::InvalidVariableName(_))));
        assert!(matches!(context.set_variable("${}", "x"), Err(MatcherError::InvalidVariableName(_))));
    }

    #[test]
    fn test_replace_variables() {
        let mut context = TestContext::new();
        context.set_variable("name", "world").unwrap();
        context.set_variable("nested", "${name}").unwrap();

        assert_eq!(context.replace_variables_in_string("hello ${name}!").unwrap(), "hello world!");
        assert_eq!(context.replace_variables_in_string("${nested}").unwrap(), "${name}");
        assert_eq!(context.replace_variables_in_string("open ${name").unwrap(), "open ${name");
        assert!(matches!(
            context.replace_variables_in_string("${missing}"),
            Err(MatcherError::UnknownVariable(_))
        ));
    }

    #[test]
    fn test_replace_functions() {
        let context = TestContext::new();
        assert_eq!(context.replace_functions_in_string("core:upperCase('abc')").unwrap(), "ABC");
        assert_eq!(
            context.replace_functions_in_string("x-core:concat('a', core:upperCase('b'), 'c')-y").unwrap(),
            "x-aBc-y"
        );
        assert_eq!(context.replace_functions_in_string("no functions here").unwrap(), "no functions here");
        assert_eq!(context.replace_functions_in_string("hardcore:upperCase('a')").unwrap(), "hardcore:upperCase('a')");
    }

    #[test]
    fn test_function_errors() {
        let context = TestContext::new();
        assert!(matches!(
            context.replace_functions_in_string("core:unknown('a')"),
            Err(MatcherError::NoSuchFunction { .. })
        ));
        assert!(matches!(
            context.replace_functions_in_string("core:upperCase('a'"),
            Err(MatcherError::InvalidFunctionCall(_))
        ));
    }

    #[test]
    fn test_function_result_is_not_rescanned() {
        let mut context = TestContext::new();
        context.set_variable("name", "world").unwrap();
        let result = context.replace_dynamic_content("core:concat('$', '{name}')").unwrap();
        assert_eq!(result, "${name}");
    }

    #[test]
    fn test_variables_before_functions() {
        let mut context = TestContext::new();
        context.set_variable("call", "core:upperCase('abc')").unwrap();
        assert_eq!(context.replace_dynamic_content("${call}").unwrap(), "ABC");
    }
}
