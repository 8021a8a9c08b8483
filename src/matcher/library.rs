use super::lookup::MatcherResolver;
use super::validation_matcher::ValidationMatcher;
use crate::error::MatcherError;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the library that owns the empty prefix
pub const STANDARD_LIBRARY_NAME: &str = "standard";

/// Prefixed collection of validation matchers.
///
/// The empty prefix marks the standard library which handles expressions
/// without a `prefix:` part.
#[derive(Clone)]
pub struct ValidationMatcherLibrary {
    name: String,
    prefix: String,
    members: HashMap<String, Arc<dyn ValidationMatcher>>,
}

impl ValidationMatcherLibrary {
    /// Create an empty library
    pub fn new<N: Into<String>, P: Into<String>>(name: N, prefix: P) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            members: HashMap::new(),
        }
    }

    /// Standard library holding every matcher the resolver knows
    pub fn standard(resolver: &dyn MatcherResolver) -> Self {
        let mut library = Self::new(STANDARD_LIBRARY_NAME, "");
        for (name, matcher) in resolver.resolve_all() {
            library.members.insert(name, matcher);
        }
        debug!("Standard validation matcher library holds {} matchers", library.members.len());
        library
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Add a matcher, replacing any member with the same name
    pub fn add_matcher(&mut self, name: &str, matcher: Arc<dyn ValidationMatcher>) {
        if self.members.insert(name.to_string(), matcher).is_some() {
            warn!("Replacing validation matcher '{}' in library '{}'", name, self.name);
        }
    }

    pub fn with_matcher(mut self, name: &str, matcher: Arc<dyn ValidationMatcher>) -> Self {
        self.add_matcher(name, matcher);
        self
    }

    /// Get a matcher by name
    pub fn get_validation_matcher(&self, name: &str) -> Result<Arc<dyn ValidationMatcher>, MatcherError> {
        self.members
            .get(name)
            .cloned()
            .ok_or_else(|| MatcherError::NoSuchMatcher {
                name: name.to_string(),
                library: self.name.clone(),
            })
    }

    /// Does `expression` (`prefix:name(...)` or `name(...)`) belong to this library?
    pub fn knows_validation_matcher(&self, expression: &str) -> Result<bool, MatcherError> {
        let body_start = expression
            .find('(')
            .ok_or_else(|| MatcherError::MissingFunctionBody(expression.to_string()))?;

        let prefix = match expression.find(':') {
            Some(colon) if colon < body_start => &expression[..=colon],
            _ => "",
        };

        let name = &expression[prefix.len()..body_start];
        Ok(prefix == self.prefix && self.members.contains_key(name))
    }

    pub fn matcher_names(&self) -> Vec<&String> {
        self.members.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl std::fmt::Debug for ValidationMatcherLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.members.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("ValidationMatcherLibrary")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("members", &names)
            .finish()
    }
}
