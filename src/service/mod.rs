//! Use-case layer and request validation.

mod cake;
mod validation;
pub use cake::CakeService;
pub use validation::{cake_rules, FieldKind, RequestValidator, ValidationRule};
