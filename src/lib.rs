//! # Validation Matchers
//!
//! Resolution and evaluation of validation matcher expressions used when
//! checking received message fields in integration tests.
//!
//! ## Features
//!
//! - **Expression resolution**: `@matches('[0-9]+')@`, `@custom:between('1','10')@`
//! - **Prefixed libraries**: registry of matcher libraries with unique prefixes
//! - **Control expression parsing**: delimiter aware parameter extraction
//! - **Dynamic content**: `${variable}` and `core:function()` replacement in parameters
//! - **Library manifests**: JSON/YAML description of extra matcher libraries
//! - **Field validation**: whole-message checks with a sticky validation status
//!
//! ## Quick Start
//!
//! ```rust
//! use validation_matchers::{TestContext, ValidationMatcherUtils};
//!
//! let mut context = TestContext::new();
//! context.set_variable("pattern", "[0-9]+").unwrap();
//!
//! assert!(ValidationMatcherUtils::resolve_validation_matcher(
//!     "orderId",
//!     "4711",
//!     "@matches('${pattern}')@",
//!     &mut context,
//! )
//! .is_ok());
//!
//! let failure = ValidationMatcherUtils::resolve_validation_matcher(
//!     "orderId",
//!     "abc",
//!     "@matches('${pattern}')@",
//!     &mut context,
//! )
//! .unwrap_err();
//! assert!(failure.is_validation_failure());
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod functions;
pub mod matcher;
pub mod utils;
pub mod validation;

pub use config::MatcherSettings;
pub use context::{TestContext, ValidationContext, ValidationStatus};
pub use error::{ErrorCategory, MatcherError, ValidationError};
pub use functions::{Function, FunctionLibrary, FunctionRegistry};
pub use matcher::{
    ControlExpressionParser, ControlParameters, DefaultControlExpressionParser, LibraryManifest,
    LibraryManifestParser, MatcherLookup, MatcherResolver, ValidationMatcher, ValidationMatcherLibrary,
    ValidationMatcherRegistry, ValidationMatcherUtils,
};
pub use validation::{FieldValidationResult, FieldValidator};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::{
        ControlExpressionParser, DefaultControlExpressionParser, FieldValidator, MatcherError, MatcherSettings, TestContext, ValidationContext,
        ValidationError, ValidationMatcher, ValidationMatcherLibrary, ValidationMatcherRegistry,
        ValidationMatcherUtils, ValidationStatus,
    };
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MatcherError>;
