pub mod matcher_error;
pub mod validation_error;

pub use matcher_error::{ErrorCategory, MatcherError};
pub use validation_error::ValidationError;

pub type Result<T> = std::result::Result<T, MatcherError>;
