pub mod test_context;
pub mod validation_context;

pub use test_context::TestContext;
pub use validation_context::{ValidationContext, ValidationStatus};
