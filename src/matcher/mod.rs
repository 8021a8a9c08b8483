pub mod builtin;
pub mod control_expression_parser;
pub mod library;
pub mod lookup;
pub mod manifest;
pub mod matcher_utils;
pub mod registry;
pub mod validation_matcher;

pub use control_expression_parser::{ControlExpressionParser, DefaultControlExpressionParser, DEFAULT_DELIMITER};
pub use library::{ValidationMatcherLibrary, STANDARD_LIBRARY_NAME};
pub use lookup::{MatcherLookup, MatcherResolver};
pub use manifest::{LibraryDefinition, LibraryManifest, LibraryManifestParser};
pub use matcher_utils::ValidationMatcherUtils;
pub use registry::ValidationMatcherRegistry;
pub use validation_matcher::{ControlParameters, ValidationMatcher};
