use super::library::ValidationMatcherLibrary;
use super::lookup::MatcherResolver;
use super::registry::ValidationMatcherRegistry;
use crate::error::MatcherError;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tokio::fs;

/// Describes extra matcher libraries built from already known matchers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryManifest {
    pub version: String,
    #[serde(default)]
    pub libraries: Vec<LibraryDefinition>,
}

/// One library: `alias -> matcher name` under a prefix such as `custom:`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryDefinition {
    pub name: String,
    pub prefix: String,
    #[serde(default)]
    pub matchers: BTreeMap<String, String>,
}

impl LibraryManifest {
    /// Build every library through `resolver` and add it to `registry`.
    ///
    /// Nothing is registered if the manifest is invalid, a matcher can not be
    /// resolved or a prefix is already taken.
    pub fn register_into(
        &self,
        registry: &mut ValidationMatcherRegistry,
        resolver: &dyn MatcherResolver,
    ) -> Result<(), MatcherError> {
        LibraryManifestParser::validate(self)?;

        let mut libraries = Vec::with_capacity(self.libraries.len());
        for definition in &self.libraries {
            libraries.push(definition.build(resolver)?);
        }

        let taken: HashSet<&str> = registry.prefixes().into_iter().collect();
        if let Some(clash) = libraries.iter().find(|l| taken.contains(l.prefix())) {
            let existing = registry.get_library_for_prefix(clash.prefix())?;
            error!(
                "Manifest library '{}' clashes with registered library '{}' on prefix '{}'",
                clash.name(),
                existing.name(),
                clash.prefix()
            );
            return Err(MatcherError::DuplicatePrefix {
                prefix: clash.prefix().to_string(),
                existing: existing.name().to_string(),
            });
        }

        for library in libraries {
            registry.add_validation_matcher_library(library)?;
        }

        info!("Registered {} validation matcher libraries from manifest", self.libraries.len());
        Ok(())
    }
}

impl LibraryDefinition {
    fn build(&self, resolver: &dyn MatcherResolver) -> Result<ValidationMatcherLibrary, MatcherError> {
        let mut library = ValidationMatcherLibrary::new(self.name.as_str(), self.prefix.as_str());
        for (alias, target) in &self.matchers {
            debug!("Library '{}': '{}{}' -> '{}'", self.name, self.prefix, alias, target);
            library.add_matcher(alias, resolver.resolve(target)?);
        }
        Ok(library)
    }
}

/// Reads library manifests from JSON or YAML
pub struct LibraryManifestParser;

impl LibraryManifestParser {
    /// Parse a manifest from JSON
    pub fn from_json(json_str: &str) -> Result<LibraryManifest, MatcherError> {
        Self::from_json_with_context(json_str, None)
    }

    fn from_json_with_context(json_str: &str, file_path: Option<&str>) -> Result<LibraryManifest, MatcherError> {
        let context = file_path.map(|p| format!(" (file: {})", p)).unwrap_or_default();
        debug!("Parsing library manifest from JSON{} ({} bytes)", context, json_str.len());

        if json_str.trim().is_empty() {
            error!("Library manifest JSON is empty{}", context);
            return Err(MatcherError::Manifest(format!("JSON parsing error{}: input string is empty", context)));
        }

        serde_json::from_str::<LibraryManifest>(json_str).map_err(|e| {
            error!("Failed to parse library manifest from JSON{}: {}", context, e);
            let detail = match e.classify() {
                serde_json::error::Category::Syntax => format!(
                    "JSON parsing error{} - syntax error at line {}, column {}: {}",
                    context,
                    e.line(),
                    e.column(),
                    e
                ),
                serde_json::error::Category::Data => {
                    format!("JSON parsing error{} - invalid data structure: {}", context, e)
                }
                serde_json::error::Category::Eof => {
                    format!("JSON parsing error{} - unexpected end of input: {}", context, e)
                }
                serde_json::error::Category::Io => format!("JSON parsing error{}: {}", context, e),
            };
            MatcherError::Manifest(detail)
        })
    }

    /// Parse a manifest from YAML
    #[cfg(feature = "yaml-support")]
    pub fn from_yaml(yaml_str: &str) -> Result<LibraryManifest, MatcherError> {
        Self::from_yaml_with_context(yaml_str, None)
    }

    #[cfg(feature = "yaml-support")]
    fn from_yaml_with_context(yaml_str: &str, file_path: Option<&str>) -> Result<LibraryManifest, MatcherError> {
        let context = file_path.map(|p| format!(" (file: {})", p)).unwrap_or_default();
        debug!("Parsing library manifest from YAML{} ({} bytes)", context, yaml_str.len());

        if yaml_str.trim().is_empty() {
            error!("Library manifest YAML is empty{}", context);
            return Err(MatcherError::Manifest(format!("YAML parsing error{}: input string is empty", context)));
        }

        serde_yaml::from_str::<LibraryManifest>(yaml_str).map_err(|e| {
            error!("Failed to parse library manifest from YAML{}: {}", context, e);
            match e.location() {
                Some(location) => MatcherError::Manifest(format!(
                    "YAML parsing error{} - syntax error at line {}, column {}: {}",
                    context,
                    location.line(),
                    location.column(),
                    e
                )),
                None => MatcherError::Manifest(format!("YAML parsing error{}: {}", context, e)),
            }
        })
    }

    /// Load a manifest file, the format follows the file extension
    pub async fn from_file(path: &str) -> Result<LibraryManifest, MatcherError> {
        info!("Loading library manifest from file: {}", path);

        if path.trim().is_empty() {
            return Err(MatcherError::Manifest("File path cannot be empty".to_string()));
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            error!("Failed to read library manifest '{}': {}", path, e);
            MatcherError::Io(format!("Failed to read file {}: {}", path, e))
        })?;

        if content.is_empty() {
            warn!("Library manifest file is empty: {}", path);
        }

        let manifest = if path.ends_with(".yaml") || path.ends_with(".yml") {
            #[cfg(feature = "yaml-support")]
            {
                Self::from_yaml_with_context(&content, Some(path))?
            }
            #[cfg(not(feature = "yaml-support"))]
            {
                error!("YAML support not enabled for file: {}", path);
                return Err(MatcherError::Manifest(format!(
                    "YAML support not enabled (file: {}). Enable 'yaml-support' feature.",
                    path
                )));
            }
        } else {
            if !path.ends_with(".json") {
                debug!("Unknown file extension for {}, defaulting to JSON", path);
            }
            Self::from_json_with_context(&content, Some(path))?
        };

        Self::validate(&manifest)?;
        info!(
            "Loaded library manifest {} with {} libraries from {}",
            manifest.version,
            manifest.libraries.len(),
            path
        );
        Ok(manifest)
    }

    pub fn to_json(manifest: &LibraryManifest) -> Result<String, MatcherError> {
        serde_json::to_string_pretty(manifest).map_err(|e| {
            error!("Failed to serialize library manifest to JSON: {}", e);
            MatcherError::Manifest(format!("JSON serialization error: {}", e))
        })
    }

    /// Structural checks: version format, library names, prefixes and aliases
    pub fn validate(manifest: &LibraryManifest) -> Result<(), MatcherError> {
        if !Self::is_valid_version(&manifest.version) {
            return Err(MatcherError::Manifest(format!(
                "Invalid version format: '{}'",
                manifest.version
            )));
        }

        let mut prefixes = HashSet::new();
        for library in &manifest.libraries {
            if library.name.trim().is_empty() {
                return Err(MatcherError::Manifest("Library name is required".to_string()));
            }

            if library.prefix.is_empty() || !library.prefix.ends_with(':') || library.prefix.len() < 2 {
                return Err(MatcherError::Manifest(format!(
                    "Library '{}' needs a prefix of the form 'name:', got '{}'",
                    library.name, library.prefix
                )));
            }

            if !prefixes.insert(library.prefix.as_str()) {
                return Err(MatcherError::Manifest(format!(
                    "Prefix '{}' is used by more than one library",
                    library.prefix
                )));
            }

            if let Some((alias, _)) = library
                .matchers
                .iter()
                .find(|(alias, target)| alias.trim().is_empty() || target.trim().is_empty())
            {
                return Err(MatcherError::Manifest(format!(
                    "Library '{}' has an incomplete matcher entry '{}'",
                    library.name, alias
                )));
            }
        }

        debug!("Library manifest {} is valid", manifest.version);
        Ok(())
    }

    fn is_valid_version(version: &str) -> bool {
        let parts: Vec<&str> = version.split('.').collect();
        (2..=3).contains(&parts.len())
            && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    }
}
