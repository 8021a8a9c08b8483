use crate::context::TestContext;
use crate::error::MatcherError;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

/// A named function callable from test data, e.g. `core:upperCase('abc')`
pub trait Function: Send + Sync {
    /// Evaluate the function with already resolved parameters
    fn execute(&self, parameters: &[String], context: &TestContext) -> Result<String, MatcherError>;
}

/// Prefixed group of functions
#[derive(Clone)]
pub struct FunctionLibrary {
    name: String,
    prefix: String,
    members: HashMap<String, Arc<dyn Function>>,
}

impl FunctionLibrary {
    pub fn new<N: Into<String>, P: Into<String>>(name: N, prefix: P) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            members: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn add_function(&mut self, name: &str, function: Arc<dyn Function>) {
        debug!("Adding function '{}{}' to library '{}'", self.prefix, name, self.name);
        self.members.insert(name.to_string(), function);
    }

    pub fn with_function(mut self, name: &str, function: Arc<dyn Function>) -> Self {
        self.add_function(name, function);
        self
    }

    pub fn get_function(&self, name: &str) -> Result<Arc<dyn Function>, MatcherError> {
        self.members
            .get(name)
            .cloned()
            .ok_or_else(|| MatcherError::NoSuchFunction {
                name: name.to_string(),
                library: self.name.clone(),
            })
    }

    pub fn knows_function(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn function_names(&self) -> Vec<&String> {
        self.members.keys().collect()
    }
}

impl std::fmt::Debug for FunctionLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionLibrary")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("members", &self.members.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Function libraries keyed by unique prefix
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    libraries: Vec<FunctionLibrary>,
}

impl FunctionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the core function library
    pub fn with_core_library() -> Self {
        let mut registry = Self::new();
        registry.libraries.push(super::builtin::core_library());
        registry
    }

    pub fn add_function_library(&mut self, library: FunctionLibrary) -> Result<(), MatcherError> {
        if library.prefix().is_empty() {
            return Err(MatcherError::InvalidFunctionCall(format!(
                "function library '{}' must declare a prefix",
                library.name()
            )));
        }

        if self.libraries.iter().any(|l| l.prefix() == library.prefix()) {
            return Err(MatcherError::DuplicateFunctionPrefix(library.prefix().to_string()));
        }

        info!("Registered function library '{}' ({})", library.name(), library.prefix());
        self.libraries.push(library);
        Ok(())
    }

    pub fn libraries(&self) -> &[FunctionLibrary] {
        &self.libraries
    }

    pub fn get_library_for_prefix(&self, prefix: &str) -> Option<&FunctionLibrary> {
        self.libraries.iter().find(|l| l.prefix() == prefix)
    }
}

/// Split a function argument list at top-level commas. Commas inside quotes or
/// nested parentheses are kept; surrounding single quotes are removed.
pub fn split_function_parameters(arguments: &str) -> Vec<String> {
    let mut parameters = Vec::new();
    if arguments.trim().is_empty() {
        return parameters;
    }

    let mut current = String::new();
    let mut depth = 0usize;
    let mut quoted = false;

    for c in arguments.chars() {
        match c {
            '\'' => {
                quoted = !quoted;
                current.push(c);
            }
            '(' if !quoted => {
                depth += 1;
                current.push(c);
            }
            ')' if !quoted => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if !quoted && depth == 0 => {
                parameters.push(unquote(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    parameters.push(unquote(&current));

    parameters
}

fn unquote(parameter: &str) -> String {
    let trimmed = parameter.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
