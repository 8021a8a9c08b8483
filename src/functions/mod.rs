pub mod builtin;
pub mod function_registry;

pub use builtin::CORE_PREFIX;
pub use function_registry::{split_function_parameters, Function, FunctionLibrary, FunctionRegistry};
