#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use validation_matchers::*;

/// Initialize test logging once, honours RUST_LOG
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Owned control parameters from string literals
pub fn params(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Matcher that records every call and passes when the value equals the
/// first control parameter
pub struct RecordingMatcher {
    name: String,
    calls: Mutex<Vec<(String, String, Vec<String>)>>,
}

impl RecordingMatcher {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Control parameters of the last call
    pub fn last_parameters(&self) -> Option<Vec<String>> {
        self.calls.lock().unwrap().last().map(|(_, _, p)| p.clone())
    }
}

impl ValidationMatcher for RecordingMatcher {
    fn validate(
        &self,
        field_name: &str,
        value: &str,
        control_parameters: &[String],
        _context: &mut TestContext,
    ) -> std::result::Result<(), MatcherError> {
        self.calls.lock().unwrap().push((
            field_name.to_string(),
            value.to_string(),
            control_parameters.to_vec(),
        ));

        match control_parameters.first() {
            Some(expected) if expected == value => Ok(()),
            _ => Err(ValidationError::mismatch(&self.name, field_name, value, control_parameters).into()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Context whose registry holds the standard library plus `extra`
pub fn context_with_libraries(extra: Vec<ValidationMatcherLibrary>) -> TestContext {
    let mut registry = ValidationMatcherRegistry::with_standard_library();
    for library in extra {
        registry.add_validation_matcher_library(library).unwrap();
    }
    TestContext::new().with_validation_matcher_registry(registry)
}

/// JSON library manifest with one `custom:` library
pub fn sample_manifest_json() -> &'static str {
    r#"{
        "version": "1.0",
        "libraries": [
            {
                "name": "customLibrary",
                "prefix": "custom:",
                "matchers": {
                    "digits": "matches",
                    "has": "contains",
                    "skip": "ignore"
                }
            }
        ]
    }"#
}
