use super::library::ValidationMatcherLibrary;
use super::lookup::MatcherLookup;
use crate::error::MatcherError;
use log::{debug, error, info};

/// Ordered collection of matcher libraries with unique prefixes
#[derive(Debug, Clone, Default)]
pub struct ValidationMatcherRegistry {
    libraries: Vec<ValidationMatcherLibrary>,
}

impl ValidationMatcherRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the standard library with all built-in matchers
    pub fn with_standard_library() -> Self {
        let lookup = MatcherLookup::new();
        Self {
            libraries: vec![ValidationMatcherLibrary::standard(&lookup)],
        }
    }

    /// Register a library. Two libraries can not share a prefix.
    pub fn add_validation_matcher_library(&mut self, library: ValidationMatcherLibrary) -> Result<(), MatcherError> {
        if let Some(existing) = self.libraries.iter().find(|l| l.prefix() == library.prefix()) {
            error!(
                "Validation matcher library '{}' uses prefix '{}' already owned by '{}'",
                library.name(),
                library.prefix(),
                existing.name()
            );
            return Err(MatcherError::DuplicatePrefix {
                prefix: library.prefix().to_string(),
                existing: existing.name().to_string(),
            });
        }

        info!(
            "Registered validation matcher library '{}' with prefix '{}' ({} matchers)",
            library.name(),
            library.prefix(),
            library.len()
        );
        self.libraries.push(library);
        Ok(())
    }

    /// Library owning exactly `prefix`
    pub fn get_library_for_prefix(&self, prefix: &str) -> Result<&ValidationMatcherLibrary, MatcherError> {
        debug!("Looking up validation matcher library for prefix '{}'", prefix);
        self.libraries
            .iter()
            .find(|l| l.prefix() == prefix)
            .ok_or_else(|| MatcherError::NoSuchLibrary {
                prefix: prefix.to_string(),
            })
    }

    pub fn libraries(&self) -> &[ValidationMatcherLibrary] {
        &self.libraries
    }

    pub fn library_names(&self) -> Vec<&str> {
        self.libraries.iter().map(|l| l.name()).collect()
    }

    pub fn prefixes(&self) -> Vec<&str> {
        self.libraries.iter().map(|l| l.prefix()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::builtin::ContainsValidationMatcher;
    use std::sync::Arc;

    #[test]
    fn test_standard_library_registered() {
        let registry = ValidationMatcherRegistry::with_standard_library();
        let library = registry.get_library_for_prefix("").unwrap();
        assert_eq!(library.name(), "standard");
        assert!(library.get_validation_matcher("matches").is_ok());
        assert!(library.get_validation_matcher("ignore").is_ok());
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let mut registry = ValidationMatcherRegistry::new();
        registry
            .add_validation_matcher_library(ValidationMatcherLibrary::new("first", "x:"))
            .unwrap();

        let result = registry.add_validation_matcher_library(ValidationMatcherLibrary::new("second", "x:"));
        assert_eq!(
            result,
            Err(MatcherError::DuplicatePrefix {
                prefix: "x:".to_string(),
                existing: "first".to_string(),
            })
        );
        assert_eq!(registry.library_names(), vec!["first"]);
    }

    #[test]
    fn test_duplicate_standard_prefix_rejected() {
        let mut registry = ValidationMatcherRegistry::with_standard_library();
        let result = registry.add_validation_matcher_library(ValidationMatcherLibrary::new("other", ""));
        assert!(matches!(result, Err(MatcherError::DuplicatePrefix { .. })));
    }

    #[test]
    fn test_distinct_prefixes_resolve_independently() {
        let mut registry = ValidationMatcherRegistry::new();
        registry
            .add_validation_matcher_library(
                ValidationMatcherLibrary::new("a", "a:").with_matcher("check", Arc::new(ContainsValidationMatcher)),
            )
            .unwrap();
        registry
            .add_validation_matcher_library(ValidationMatcherLibrary::new("b", "b:"))
            .unwrap();

        assert_eq!(registry.get_library_for_prefix("a:").unwrap().name(), "a");
        assert_eq!(registry.get_library_for_prefix("b:").unwrap().name(), "b");
        assert_eq!(registry.prefixes(), vec!["a:", "b:"]);
    }

    #[test]
    fn test_unknown_prefix() {
        let registry = ValidationMatcherRegistry::with_standard_library();
        assert_eq!(
            registry.get_library_for_prefix("myLib:").unwrap_err(),
            MatcherError::NoSuchLibrary {
                prefix: "myLib:".to_string()
            }
        );
    }
}
