use super::builtin;
use super::validation_matcher::ValidationMatcher;
use crate::error::MatcherError;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Resolves logical matcher names to matcher instances
pub trait MatcherResolver: Send + Sync {
    /// Resolve one matcher by name
    fn resolve(&self, name: &str) -> Result<Arc<dyn ValidationMatcher>, MatcherError>;

    /// All known matchers by name
    fn resolve_all(&self) -> HashMap<String, Arc<dyn ValidationMatcher>>;
}

/// Registration table of matcher implementations.
///
/// The name to instance map is built lazily on first use and kept for the
/// lifetime of the lookup, so every resolve of a name hands out the same
/// instance. Registering a new entry drops the cached map.
pub struct MatcherLookup {
    include_builtin: bool,
    entries: Vec<(String, Arc<dyn ValidationMatcher>)>,
    cache: OnceLock<HashMap<String, Arc<dyn ValidationMatcher>>>,
}

impl MatcherLookup {
    /// Lookup over all built-in matchers
    pub fn new() -> Self {
        Self {
            include_builtin: true,
            entries: Vec::new(),
            cache: OnceLock::new(),
        }
    }

    /// Lookup without built-in matchers
    pub fn empty() -> Self {
        Self {
            include_builtin: false,
            ..Self::new()
        }
    }

    /// Register a matcher under `name`, overriding a built-in of the same name
    pub fn register(&mut self, name: &str, matcher: Arc<dyn ValidationMatcher>) {
        debug!("Registering validation matcher '{}' in lookup", name);
        self.entries.push((name.to_string(), matcher));
        self.cache.take();
    }

    pub fn with_matcher(mut self, name: &str, matcher: Arc<dyn ValidationMatcher>) -> Self {
        self.register(name, matcher);
        self
    }

    /// Whether the name to instance map has been built yet
    pub fn is_populated(&self) -> bool {
        self.cache.get().is_some()
    }

    fn matchers(&self) -> &HashMap<String, Arc<dyn ValidationMatcher>> {
        self.cache.get_or_init(|| {
            let mut matchers = HashMap::new();
            if self.include_builtin {
                for (name, matcher) in builtin::builtin_matchers() {
                    matchers.insert(name.to_string(), matcher);
                }
            }
            for (name, matcher) in &self.entries {
                matchers.insert(name.clone(), Arc::clone(matcher));
            }
            info!("Loaded {} validation matchers", matchers.len());
            matchers
        })
    }
}

impl Default for MatcherLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl MatcherResolver for MatcherLookup {
    fn resolve(&self, name: &str) -> Result<Arc<dyn ValidationMatcher>, MatcherError> {
        self.matchers()
            .get(name)
            .cloned()
            .ok_or_else(|| MatcherError::NoSuchMatcher {
                name: name.to_string(),
                library: "matcher lookup".to_string(),
            })
    }

    fn resolve_all(&self) -> HashMap<String, Arc<dyn ValidationMatcher>> {
        self.matchers().clone()
    }
}

impl std::fmt::Debug for MatcherLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcherLookup")
            .field("include_builtin", &self.include_builtin)
            .field("entries", &self.entries.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .field("populated", &self.is_populated())
            .finish()
    }
}
